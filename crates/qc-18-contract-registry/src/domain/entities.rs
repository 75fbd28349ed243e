//! # Core Domain Entities
//!
//! Records held by the registry and the results produced by its operations.

use crate::domain::abi::AbiValue;
use crate::domain::value_objects::{Address, CodeKind, TxHandle, Visibility, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// CONTRACT RECORD
// =============================================================================

/// Metadata registered for one contract.
///
/// Records are created at registration time and never updated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    /// Ledger-assigned contract address (unique key).
    pub address: Address,
    /// Human label.
    pub name: String,
    /// Serialized interface description (ABI JSON).
    pub interface_description: String,
    /// Source code or bytecode, per `code_kind`.
    pub source: String,
    /// Kind of payload in `source`.
    pub code_kind: CodeKind,
    /// Creation time, epoch milliseconds. Zero means "not yet registered".
    pub created_at: u64,
    /// Public, private-to-group, or private-and-unreadable.
    #[serde(rename = "visibilityScope")]
    pub visibility: Visibility,
}

impl ContractRecord {
    /// Returns true once the record carries a creation time.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.created_at > 0
    }

    /// Wire visibility scope string.
    #[must_use]
    pub fn visibility_scope(&self) -> &str {
        self.visibility.scope()
    }
}

// =============================================================================
// REGISTRATION REQUEST
// =============================================================================

/// Input of a registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Account submitting the public registration (ledger default if `None`).
    pub actor: Option<Address>,
    /// Address of the contract being registered.
    pub id: Address,
    /// Contract name.
    pub name: String,
    /// Interface description (ABI JSON).
    pub interface_description: String,
    /// Source code or bytecode.
    pub source: String,
    /// Kind of payload in `source`.
    pub code_kind: CodeKind,
    /// Creation time, epoch milliseconds.
    pub created_at: u64,
    /// Empty for public; a group name routes the record to the private store.
    pub visibility_scope: String,
}

impl RegistrationRequest {
    /// Builds the record written to the private store.
    #[must_use]
    pub fn into_record(self) -> ContractRecord {
        ContractRecord {
            visibility: Visibility::from_scope(&self.visibility_scope),
            address: self.id,
            name: self.name,
            interface_description: self.interface_description,
            source: self.source,
            code_kind: self.code_kind,
            created_at: self.created_at,
        }
    }

    /// Ordered arguments of the registry's `register` entry point:
    /// `(id, name, interfaceDescription, source, codeKind, createdAt)`.
    #[must_use]
    pub fn register_args(&self) -> Vec<AbiValue> {
        vec![
            AbiValue::Address(self.id.clone()),
            AbiValue::String(self.name.clone()),
            AbiValue::String(self.interface_description.clone()),
            AbiValue::String(self.source.clone()),
            AbiValue::String(self.code_kind.as_str().to_string()),
            AbiValue::Uint(U256::from(self.created_at)),
        ]
    }
}

// =============================================================================
// LEDGER RESULTS
// =============================================================================

/// A mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    /// Handle the transaction was submitted under.
    pub handle: TxHandle,
    /// Address of the created contract, for deployments.
    pub contract_address: Option<Address>,
    /// Block the transaction was mined in.
    pub block_number: u64,
}

/// Existence information for a contract address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractInfo {
    /// The probed address.
    pub address: Address,
    /// Size of the deployed code.
    pub code_size: usize,
}

// =============================================================================
// LISTING
// =============================================================================

/// An identifier dropped from a listing, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    /// The identifier that could not be resolved.
    pub id: Address,
    /// Why it was skipped.
    pub reason: String,
}

/// Merged view over the public registry and the private store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryListing {
    /// Resolved records, ascending by `created_at`.
    pub records: Vec<ContractRecord>,
    /// Identifiers that failed resolution.
    pub skipped: Vec<SkippedEntry>,
}

impl RegistryListing {
    /// Drops the skip log.
    #[must_use]
    pub fn into_records(self) -> Vec<ContractRecord> {
        self.records
    }

    /// Sorts records ascending by creation time. Ties keep their order.
    pub fn sort_by_creation(&mut self) {
        self.records.sort_by_key(|record| record.created_at);
    }
}

// =============================================================================
// DEPLOYMENT
// =============================================================================

/// Result of deploying the registry contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Deployed, confirmed and recorded in local configuration.
    Deployed {
        /// The new registry address.
        address: Address,
    },
    /// Nothing usable happened (submission or confirmation failed).
    Failed {
        /// Why.
        reason: String,
    },
    /// The contract exists on the ledger but its address was not durably
    /// recorded.
    DeployedNotPersisted {
        /// The new registry address.
        address: Address,
        /// Why the local write failed.
        reason: String,
    },
}

impl DeployOutcome {
    /// True only for a full success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Deployed { .. })
    }

    /// Address of the deployed registry, if one was created.
    #[must_use]
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::Deployed { address } | Self::DeployedNotPersisted { address, .. } => {
                Some(address)
            }
            Self::Failed { .. } => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scope: &str) -> RegistrationRequest {
        RegistrationRequest {
            actor: None,
            id: Address::new("0x01"),
            name: "Token".into(),
            interface_description: "[]".into(),
            source: "contract Token {}".into(),
            code_kind: CodeKind::Solidity,
            created_at: 1_700_000_000_000,
            visibility_scope: scope.into(),
        }
    }

    #[test]
    fn test_register_args_order() {
        let args = request("").register_args();
        assert_eq!(args.len(), 6);
        assert_eq!(args[0], AbiValue::Address(Address::new("0x01")));
        assert_eq!(args[1], AbiValue::String("Token".into()));
        assert_eq!(args[4], AbiValue::String("solidity".into()));
        assert_eq!(args[5], AbiValue::Uint(U256::from(1_700_000_000_000u64)));
    }

    #[test]
    fn test_into_record_keeps_scope() {
        let record = request("bankA").into_record();
        assert_eq!(record.visibility_scope(), "bankA");
        assert!(record.is_registered());
    }

    #[test]
    fn test_listing_sort_is_stable() {
        let mut a = request("").into_record();
        a.created_at = 5;
        let mut b = a.clone();
        b.name = "B".into();
        let mut c = a.clone();
        c.created_at = 1;

        let mut listing = RegistryListing {
            records: vec![a, b, c],
            skipped: vec![],
        };
        listing.sort_by_creation();

        let order: Vec<_> = listing.records.iter().map(|r| r.created_at).collect();
        assert_eq!(order, vec![1, 5, 5]);
        assert_eq!(listing.records[1].name, "Token");
        assert_eq!(listing.records[2].name, "B");
    }

    #[test]
    fn test_deploy_outcome() {
        let addr = Address::new("0xRC");
        assert!(DeployOutcome::Deployed {
            address: addr.clone()
        }
        .is_success());

        let partial = DeployOutcome::DeployedNotPersisted {
            address: addr.clone(),
            reason: "disk".into(),
        };
        assert!(!partial.is_success());
        assert_eq!(partial.address(), Some(&addr));

        let failed = DeployOutcome::Failed {
            reason: "timeout".into(),
        };
        assert_eq!(failed.address(), None);
    }

    #[test]
    fn test_record_json_uses_scope_string() {
        let record = request("bankA").into_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["visibilityScope"], "bankA");
        assert_eq!(json["codeKind"], "solidity");

        let back: ContractRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
