//! # QC-18 Contract Registry - Contract Metadata Resolution Subsystem
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Maps contract addresses to descriptive metadata (name, interface
//! description, source, creation time, visibility scope). Metadata is split
//! between a public registry contract on the ledger and a local private store.
//! The subsystem resolves where the registry contract lives, routes each
//! registration to the right store, and produces a merged, time-ordered,
//! visibility-annotated listing across both.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Private records never reach the ledger registry | `domain/invariants.rs` - `routes_to_private_store()` |
//! | The registry never registers itself | `domain/invariants.rs` - `is_self_registration()` |
//! | Sentinel results never leave the decoder | `domain/abi.rs` - `decode_registry_entry()` |
//! | Listings ascend by creation time | `domain/entities.rs` - `RegistryListing::sort_by_creation()` |
//! | One bad entry never fails a listing | `service/listing.rs` - `list_detailed()` |
//!
//! ## Address Resolution
//!
//! | Priority | Source | Written on deploy |
//! |----------|--------|-------------------|
//! | 1 (lowest) | Local configuration file | Yes (authoritative) |
//! | 2 | Shared file of co-located nodes | Yes (best-effort) |
//! | 3 (highest) | Environment variable | No |
//!
//! ## Outbound Dependencies
//!
//! | Port | Purpose |
//! |------|---------|
//! | `LedgerExecutor` | Deploy, call and read contracts |
//! | `ConfirmationWaiter` | Bounded wait for a mined transaction |
//! | `PrivateContractStore` | Off-ledger records |
//! | `LocalConfigStore` / `SharedAddressSource` / `Environment` | Registry address sources |
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_contract_registry::prelude::*;
//!
//! if !registry.registry_exists().await {
//!     let outcome = registry.deploy().await;
//!     assert!(outcome.is_success());
//! }
//!
//! registry.register(request).await?;
//! for record in registry.list().await? {
//!     println!("{} {} {}", record.created_at, record.name, record.visibility_scope());
//! }
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod address_store;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;

#[cfg(test)]
mod test_utils;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        ConfirmedTransaction, ContractInfo, ContractRecord, DeployOutcome, RegistrationRequest,
        RegistryListing, SkippedEntry,
    };

    // Value objects
    pub use crate::domain::value_objects::{Address, CodeKind, TxHandle, Visibility, U256};

    // Interface descriptions
    pub use crate::domain::abi::{AbiValue, ContractAbi};

    // Ports
    pub use crate::ports::inbound::ContractRegistryApi;
    pub use crate::ports::outbound::{
        ConfirmationWaiter, Environment, LedgerExecutor, LocalConfigStore, PrivateContractStore,
        ReceiptSource, SharedAddressSource,
    };

    // Errors
    pub use crate::errors::{ConfigError, LedgerError, RegistryError, StoreError};

    // Adapters
    pub use crate::adapters::{
        FileBackedPrivateStore, InMemoryConfigStore, InMemoryLedger, InMemoryPrivateStore,
        PollingConfirmationWaiter, PropertiesConfigStore, SharedAddressFile, StaticEnvironment,
        SystemEnvironment,
    };

    // Service
    pub use crate::address_store::AddressStore;
    pub use crate::config::RegistryConfig;
    pub use crate::service::{ContractRegistryService, RegistryDependencies, RegistryStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Contract Registry";

// =============================================================================
// TESTS
// =============================================================================
