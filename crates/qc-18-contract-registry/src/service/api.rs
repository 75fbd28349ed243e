//! # Contract Registry API Implementation
//!
//! Implements the `ContractRegistryApi` trait.

use super::{ContractRegistryService, REGISTRY_SOURCE};
use crate::domain::abi::REGISTER;
use crate::domain::entities::{
    ConfirmedTransaction, ContractRecord, DeployOutcome, RegistrationRequest,
};
use crate::domain::invariants::{is_self_registration, routes_to_private_store};
use crate::domain::value_objects::{Address, TxHandle};
use crate::errors::{LedgerError, RegistryError};
use crate::ports::inbound::ContractRegistryApi;
use crate::ports::outbound::{ConfirmationWaiter, LedgerExecutor, PrivateContractStore};
use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

impl<L, W, P> ContractRegistryService<L, W, P>
where
    L: LedgerExecutor,
    W: ConfirmationWaiter,
    P: PrivateContractStore,
{
    async fn submit_deployment(&self) -> Result<ConfirmedTransaction, LedgerError> {
        let handle = self.ledger.create(REGISTRY_SOURCE).await?;
        debug!(tx = %handle, "Registry deployment submitted");
        self.waiter
            .wait_for(&handle, self.config.confirmation_timeout)
            .await
    }

    async fn skip_registration(&self, reason: &str) -> Result<Option<TxHandle>, RegistryError> {
        debug!(reason, "Registration skipped");
        self.stats.write().await.skipped_registrations += 1;
        Ok(None)
    }
}

#[async_trait]
impl<L, W, P> ContractRegistryApi for ContractRegistryService<L, W, P>
where
    L: LedgerExecutor,
    W: ConfirmationWaiter,
    P: PrivateContractStore,
{
    #[instrument(skip(self))]
    async fn deploy(&self) -> DeployOutcome {
        self.stats.write().await.deploy_attempts += 1;

        let confirmed = match self.submit_deployment().await {
            Ok(confirmed) => confirmed,
            Err(e) if e.is_wait_abort() => {
                warn!(error = %e, "Registry deployment not confirmed");
                return DeployOutcome::Failed {
                    reason: e.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "Registry deployment failed");
                return DeployOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let Some(address) = confirmed.contract_address else {
            error!(tx = %confirmed.handle, "Confirmed deployment carries no contract address");
            return DeployOutcome::Failed {
                reason: format!("transaction {} created no contract", confirmed.handle),
            };
        };

        if let Err(e) = self.addresses.persist(&address) {
            error!(
                address = %address,
                error = %e,
                "Registry deployed but its address was not stored"
            );
            return DeployOutcome::DeployedNotPersisted {
                address,
                reason: e.to_string(),
            };
        }

        self.stats.write().await.deployments += 1;
        info!(
            address = %address,
            block = confirmed.block_number,
            "Contract registry deployed"
        );
        DeployOutcome::Deployed { address }
    }

    fn update_address(&self, address: Address) {
        self.addresses.override_address(address);
    }

    #[instrument(skip(self, request), fields(id = %request.id, name = %request.name))]
    async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<Option<TxHandle>, RegistryError> {
        let Some(registry) = self.addresses.current() else {
            return self.skip_registration("no registry address resolved").await;
        };

        if is_self_registration(&request.name, &request.id, &registry) {
            return self.skip_registration("registry contract itself").await;
        }

        if routes_to_private_store(&request.visibility_scope) {
            let record = request.into_record();
            self.private_store.save(&record).await.map_err(|e| {
                error!(error = %e, "Private registration failed");
                RegistryError::from(e)
            })?;
            info!(
                scope = record.visibility_scope(),
                "Contract registered privately"
            );
            self.stats.write().await.private_registrations += 1;
            return Ok(None);
        }

        let handle = self
            .transact_registry(
                &registry,
                request.actor.as_ref(),
                REGISTER,
                request.register_args(),
            )
            .await
            .map_err(|e| {
                error!(registry = %registry, error = %e, "Public registration failed");
                e
            })?;
        info!(tx = %handle, registry = %registry, "Contract registration submitted");
        self.stats.write().await.public_registrations += 1;
        Ok(Some(handle))
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn get_by_id(&self, id: &Address) -> Result<Option<ContractRecord>, RegistryError> {
        self.stats.write().await.lookups += 1;
        self.resolve_record(id).await.map_err(|e| {
            warn!(error = %e, "Contract lookup failed");
            e
        })
    }

    async fn list(&self) -> Result<Vec<ContractRecord>, RegistryError> {
        Ok(self.list_detailed().await?.into_records())
    }

    #[instrument(skip(self))]
    async fn registry_exists(&self) -> bool {
        let Some(address) = self.addresses.resolve() else {
            warn!("No registry address configured");
            return false;
        };

        match self.ledger.get(&address).await {
            Ok(info) => {
                debug!(address = %address, code_size = info.code_size, "Registry contract found");
                true
            }
            Err(e) => {
                warn!(address = %address, error = %e, "Registry contract not reachable");
                false
            }
        }
    }

    fn get_address(&self) -> Option<Address> {
        self.addresses.current()
    }
}
