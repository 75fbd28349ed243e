//! # Driving Ports (API - Inbound)
//!
//! The operations the Contract Registry exposes to the rest of the node
//! (API gateway, contract deployment flow, admin tools).

use crate::domain::entities::{ContractRecord, DeployOutcome, RegistrationRequest};
use crate::domain::value_objects::{Address, TxHandle};
use crate::errors::RegistryError;
use async_trait::async_trait;

/// Primary API of the Contract Registry.
///
/// ## Usage
///
/// ```ignore
/// if !api.registry_exists().await {
///     api.deploy().await;
/// }
/// let handle = api.register(request).await?;
/// let all = api.list().await?;
/// ```
#[async_trait]
pub trait ContractRegistryApi: Send + Sync {
    /// Deploy a new registry contract and record its address.
    ///
    /// Not idempotent: every call deploys a new instance.
    async fn deploy(&self) -> DeployOutcome;

    /// Replace the in-memory registry address for the life of the process.
    ///
    /// Not persisted.
    fn update_address(&self, address: Address);

    /// Register a contract's metadata.
    ///
    /// # Returns
    ///
    /// * `Some(TxHandle)` - public registration submitted (not yet confirmed)
    /// * `None` - skipped, or written to the private store
    async fn register(&self, request: RegistrationRequest)
        -> Result<Option<TxHandle>, RegistryError>;

    /// Resolve one id, private store first.
    async fn get_by_id(&self, id: &Address) -> Result<Option<ContractRecord>, RegistryError>;

    /// Every resolvable record from both stores, ascending by creation time.
    async fn list(&self) -> Result<Vec<ContractRecord>, RegistryError>;

    /// Re-resolve the registry address and check it has live code.
    async fn registry_exists(&self) -> bool;

    /// The registry address currently in use.
    fn get_address(&self) -> Option<Address>;
}
