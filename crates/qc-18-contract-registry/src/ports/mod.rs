//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the Contract Registry.
//!
//! - **Driving Ports (Inbound)**: `ContractRegistryApi`
//! - **Driven Ports (Outbound)**: `LedgerExecutor`, `ConfirmationWaiter`,
//!   `PrivateContractStore`, `LocalConfigStore`, `SharedAddressSource`,
//!   `Environment`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
