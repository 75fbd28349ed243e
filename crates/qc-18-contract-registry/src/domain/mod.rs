//! # Domain Layer (Inner Hexagon)
//!
//! Pure types and functions for contract registry resolution.
//! NO I/O, NO async.
//!
//! - `value_objects`: addresses, code kinds, visibility
//! - `entities`: records, registration requests, listings, deploy outcomes
//! - `abi`: interface descriptions, call values, registry result decoding
//! - `properties`: the flat `key=value` file format
//! - `invariants`: registration and ordering guards

pub mod abi;
pub mod entities;
pub mod invariants;
pub mod properties;
pub mod value_objects;

pub use abi::*;
pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
