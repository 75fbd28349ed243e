//! # Adapters Layer (Outer Hexagon)
//!
//! Implementations of the driven ports.
//!
//! | Port | Adapter |
//! |------|---------|
//! | `LedgerExecutor`, `ReceiptSource` | `InMemoryLedger` |
//! | `ConfirmationWaiter` | `PollingConfirmationWaiter` |
//! | `PrivateContractStore` | `InMemoryPrivateStore`, `FileBackedPrivateStore` |
//! | `LocalConfigStore` | `PropertiesConfigStore`, `InMemoryConfigStore` |
//! | `SharedAddressSource` | `SharedAddressFile` |
//! | `Environment` | `SystemEnvironment`, `StaticEnvironment` |

pub mod config_files;
pub mod confirmation;
pub mod environment;
pub mod ledger;
pub mod private_store;

pub use config_files::{
    InMemoryConfigStore, PropertiesConfigStore, SharedAddressFile, REGISTRY_ADDRESS_KEY,
};
pub use confirmation::PollingConfirmationWaiter;
pub use environment::{StaticEnvironment, SystemEnvironment};
pub use ledger::{InMemoryLedger, SubmittedCall};
pub use private_store::{FileBackedPrivateStore, InMemoryPrivateStore};
