//! # Record Resolution and Listing
//!
//! Single-record lookup (private store first) and the merged listing over
//! both stores.

use super::ContractRegistryService;
use crate::domain::abi::{
    decode_address_index, decode_registry_entry, AbiValue, GET_BY_ID, LIST_ADDRS,
};
use crate::domain::entities::{ContractRecord, RegistryListing, SkippedEntry};
use crate::domain::value_objects::{Address, Visibility};
use crate::errors::RegistryError;
use crate::ports::outbound::{ConfirmationWaiter, LedgerExecutor, PrivateContractStore};
use tracing::{debug, error, info, instrument, warn};

/// Skip reason for an indexed id with no registered payload.
pub(crate) const NOT_REGISTERED: &str = "not registered";

impl<L, W, P> ContractRegistryService<L, W, P>
where
    L: LedgerExecutor,
    W: ConfirmationWaiter,
    P: PrivateContractStore,
{
    /// Resolve one id: private store, then the ledger registry.
    ///
    /// Sentinel results from the registry come back as `Ok(None)`.
    pub(crate) async fn resolve_record(
        &self,
        id: &Address,
    ) -> Result<Option<ContractRecord>, RegistryError> {
        if let Some(record) = self.private_store.get_by_id(id).await? {
            return Ok(Some(record));
        }

        let Some(registry) = self.addresses.current() else {
            debug!(id = %id, "No registry address resolved, public lookup skipped");
            return Ok(None);
        };

        let result = self
            .read_registry(&registry, GET_BY_ID, vec![AbiValue::Address(id.clone())])
            .await?;
        decode_registry_entry(&result)
    }

    /// Every resolvable record from both stores, ascending by creation time,
    /// together with the ids that were left out and why.
    ///
    /// Public index ids come first, then private ids; nothing is
    /// deduplicated. A failure to resolve one id only skips that id.
    ///
    /// # Errors
    ///
    /// * `RegistryError::Ledger` - the public index could not be read
    /// * `RegistryError::PrivateStore` - private ids could not be enumerated
    #[instrument(skip(self))]
    pub async fn list_detailed(&self) -> Result<RegistryListing, RegistryError> {
        let mut ids = match self.addresses.current() {
            Some(registry) => match self.read_address_index(&registry).await {
                Ok(ids) => ids,
                Err(e) => {
                    error!(
                        registry = %registry,
                        error = %e,
                        "Reading public registry index failed"
                    );
                    return Err(e);
                }
            },
            None => {
                warn!("No registry address resolved, listing private records only");
                Vec::new()
            }
        };
        let public_count = ids.len();
        let private_ids = match self.private_store.list_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Enumerating private records failed");
                return Err(e.into());
            }
        };
        ids.extend(private_ids);

        let mut listing = RegistryListing::default();
        for id in ids {
            match self.resolve_record(&id).await {
                Ok(Some(record)) => listing.records.push(self.probe_visibility(record).await),
                Ok(None) => {
                    debug!(id = %id, "Indexed contract has no registered record");
                    listing.skipped.push(SkippedEntry {
                        id,
                        reason: NOT_REGISTERED.to_string(),
                    });
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping unresolvable registry entry");
                    listing.skipped.push(SkippedEntry {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        listing.sort_by_creation();

        info!(
            public = public_count,
            records = listing.records.len(),
            skipped = listing.skipped.len(),
            "Listed contract registry"
        );

        let mut stats = self.stats.write().await;
        stats.list_calls += 1;
        stats.skipped_list_entries += listing.skipped.len() as u64;

        Ok(listing)
    }

    async fn read_address_index(&self, registry: &Address) -> Result<Vec<Address>, RegistryError> {
        let index = self.read_registry(registry, LIST_ADDRS, Vec::new()).await?;
        decode_address_index(&index)
    }

    /// Mark private records whose contract this node cannot read.
    async fn probe_visibility(&self, mut record: ContractRecord) -> ContractRecord {
        if !record.visibility.is_private() {
            return record;
        }
        if let Err(e) = self.ledger.get(&record.address).await {
            debug!(
                id = %record.address,
                error = %e,
                "Private contract not readable from this node"
            );
            record.visibility = Visibility::PrivateOpaque;
        }
        record
    }
}
