//! # Driven Ports (SPI - Outbound)
//!
//! The collaborators the Contract Registry depends on. Adapters implement
//! these traits to provide:
//! - Contract calls against the ledger
//! - Transaction confirmation
//! - The private (off-ledger) contract store
//! - Local configuration and the process environment
//!
//! Dependencies point INWARD: adapters implement these traits, the service
//! only ever sees the traits.

use crate::domain::abi::{AbiValue, ContractAbi};
use crate::domain::entities::{ConfirmedTransaction, ContractInfo, ContractRecord};
use crate::domain::value_objects::{Address, TxHandle};
use crate::errors::{ConfigError, LedgerError, StoreError};
use async_trait::async_trait;
use std::time::Duration;

// =============================================================================
// LEDGER EXECUTION
// =============================================================================

/// Submits and reads contract calls.
#[async_trait]
pub trait LedgerExecutor: Send + Sync {
    /// Submit a contract deployment (no constructor arguments).
    async fn create(&self, code: &str) -> Result<TxHandle, LedgerError>;

    /// Submit a state-changing call.
    ///
    /// Returns as soon as the transaction is accepted; confirmation is the
    /// caller's concern.
    async fn transact(
        &self,
        address: &Address,
        abi: &ContractAbi,
        actor: Option<&Address>,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<TxHandle, LedgerError>;

    /// Execute a read-only call.
    ///
    /// # Returns
    ///
    /// * The result tuple. Elements the node could not decode are `None`.
    async fn read(
        &self,
        address: &Address,
        abi: &ContractAbi,
        actor: Option<&Address>,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<Option<AbiValue>>, LedgerError>;

    /// Check that contract code exists at `address` and is readable here.
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotFound` - no code at the address
    /// * `LedgerError::AccessDenied` - private contract this node is not party to
    async fn get(&self, address: &Address) -> Result<ContractInfo, LedgerError>;
}

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Blocks until a submitted transaction is mined.
#[async_trait]
pub trait ConfirmationWaiter: Send + Sync {
    /// Wait for `handle` to be mined, for at most `timeout`.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Timeout` - not mined in time
    /// * `LedgerError::Interrupted` - the wait was cancelled
    async fn wait_for(
        &self,
        handle: &TxHandle,
        timeout: Duration,
    ) -> Result<ConfirmedTransaction, LedgerError>;
}

/// Non-blocking receipt lookup, polled by the confirmation waiter.
#[async_trait]
pub trait ReceiptSource: Send + Sync {
    /// Returns the receipt if the transaction is mined, `None` if pending.
    async fn receipt(
        &self,
        handle: &TxHandle,
    ) -> Result<Option<ConfirmedTransaction>, LedgerError>;
}

// =============================================================================
// PRIVATE STORE
// =============================================================================

/// Local store of records that are never written to the ledger.
///
/// Locking and transactions are the store's own concern.
#[async_trait]
pub trait PrivateContractStore: Send + Sync {
    /// Persist a record, keyed by its address.
    async fn save(&self, record: &ContractRecord) -> Result<(), StoreError>;

    /// Look up a record.
    async fn get_by_id(&self, id: &Address) -> Result<Option<ContractRecord>, StoreError>;

    /// All stored ids. No ordering is guaranteed.
    async fn list_ids(&self) -> Result<Vec<Address>, StoreError>;
}

// =============================================================================
// CONFIGURATION SOURCES
// =============================================================================

/// Durable, process-local copy of the registry address.
pub trait LocalConfigStore: Send + Sync {
    /// Read the stored address. `Ok(None)` if nothing is stored.
    fn load(&self) -> Result<Option<Address>, ConfigError>;

    /// Store the address.
    fn save(&self, address: &Address) -> Result<(), ConfigError>;
}

/// Address file shared by co-located nodes.
///
/// Best-effort: no locking, last writer wins.
pub trait SharedAddressSource: Send + Sync {
    /// Current shared value. Unreadable or blank means `None`.
    fn read(&self) -> Option<Address>;

    /// Publish the address for sibling processes.
    fn write(&self, address: &Address) -> Result<(), ConfigError>;
}

/// Process environment lookup.
pub trait Environment: Send + Sync {
    /// Value of variable `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

// =============================================================================
// TESTS
// =============================================================================
