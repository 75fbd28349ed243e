//! # Contract Registry Service
//!
//! The main service implementing the Contract Registry API.
//!
//! ## Architecture
//!
//! This service composes, over the driven ports:
//! 1. Registry deployment (submit, bounded confirmation wait, persist address)
//! 2. Registration routing (public ledger registry vs. private store)
//! 3. Record resolution (private store first, then the ledger registry)
//! 4. Merged listing with per-entry failure isolation
//! 5. Registry existence check
//!
//! The registry address comes from an injected [`AddressStore`].

mod api;
mod listing;

use crate::address_store::AddressStore;
use crate::config::RegistryConfig;
use crate::domain::abi::{AbiValue, ContractAbi};
use crate::domain::value_objects::{Address, TxHandle};
use crate::errors::RegistryError;
use crate::ports::outbound::{ConfirmationWaiter, LedgerExecutor, PrivateContractStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the registry contract, submitted on deployment.
pub const REGISTRY_SOURCE: &str = include_str!("../../contracts/ContractRegistry.sol");

/// Interface description of the registry contract.
pub const REGISTRY_ABI: &str = include_str!("../../contracts/ContractRegistry.abi.json");

/// Statistics for the Contract Registry service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    /// Deployments attempted.
    pub deploy_attempts: u64,
    /// Deployments confirmed and recorded locally.
    pub deployments: u64,
    /// Registrations submitted to the ledger registry.
    pub public_registrations: u64,
    /// Registrations written to the private store.
    pub private_registrations: u64,
    /// Registrations skipped (no registry address, or the registry itself).
    pub skipped_registrations: u64,
    /// Single-record lookups served.
    pub lookups: u64,
    /// Listings served.
    pub list_calls: u64,
    /// Entries left out of listings.
    pub skipped_list_entries: u64,
}

/// Dependencies for [`ContractRegistryService`].
pub struct RegistryDependencies<L, W, P> {
    /// Ledger execution.
    pub ledger: Arc<L>,
    /// Deployment confirmation.
    pub waiter: W,
    /// Private (off-ledger) records.
    pub private_store: Arc<P>,
}

/// The Contract Registry service.
///
/// Implements [`crate::ports::inbound::ContractRegistryApi`].
pub struct ContractRegistryService<L, W, P>
where
    L: LedgerExecutor,
    W: ConfirmationWaiter,
    P: PrivateContractStore,
{
    pub(crate) ledger: Arc<L>,
    pub(crate) waiter: W,
    pub(crate) private_store: Arc<P>,
    pub(crate) addresses: Arc<AddressStore>,
    pub(crate) config: RegistryConfig,
    /// Parsed registry interface, used to check every registry call.
    pub(crate) abi: ContractAbi,
    pub(crate) stats: RwLock<RegistryStats>,
}

impl<L, W, P> ContractRegistryService<L, W, P>
where
    L: LedgerExecutor,
    W: ConfirmationWaiter,
    P: PrivateContractStore,
{
    /// Create the service.
    ///
    /// # Errors
    ///
    /// * `RegistryError::InvalidAbi` - the embedded registry interface does not parse
    pub fn new(
        deps: RegistryDependencies<L, W, P>,
        addresses: Arc<AddressStore>,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            ledger: deps.ledger,
            waiter: deps.waiter,
            private_store: deps.private_store,
            addresses,
            config,
            abi: ContractAbi::from_json(REGISTRY_ABI)?,
            stats: RwLock::new(RegistryStats::default()),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> RegistryStats {
        self.stats.read().await.clone()
    }

    /// The registry contract's interface description.
    #[must_use]
    pub fn registry_abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// The address resolver this service reads from.
    #[must_use]
    pub fn address_store(&self) -> &Arc<AddressStore> {
        &self.addresses
    }

    /// Submit a state-changing call to the registry.
    async fn transact_registry(
        &self,
        registry: &Address,
        actor: Option<&Address>,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<TxHandle, RegistryError> {
        self.abi.check_call(method, &args)?;
        Ok(self
            .ledger
            .transact(registry, &self.abi, actor, method, args)
            .await?)
    }

    /// Read from the registry.
    async fn read_registry(
        &self,
        registry: &Address,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<Option<AbiValue>>, RegistryError> {
        self.abi.check_call(method, &args)?;
        Ok(self
            .ledger
            .read(registry, &self.abi, None, method, args)
            .await?)
    }
}
