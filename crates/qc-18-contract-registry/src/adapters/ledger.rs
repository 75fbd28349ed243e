//! # In-Memory Ledger
//!
//! Simulated ledger node for testing and local development.
//! Production implementation would talk to the node's JSON-RPC endpoint.
//!
//! Every deployed contract answers the registry entry points (`register`,
//! `getById`, `listAddrs`), so the registry can be deployed and exercised
//! end to end. Mining is immediate unless manual mining is switched on.

use crate::domain::abi::{AbiValue, ContractAbi, GET_BY_ID, LIST_ADDRS, REGISTER};
use crate::domain::entities::{ConfirmedTransaction, ContractInfo};
use crate::domain::value_objects::{Address, TxHandle, U256};
use crate::errors::LedgerError;
use crate::ports::outbound::{LedgerExecutor, ReceiptSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use std::collections::{HashMap, HashSet};

/// A state-changing call accepted by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedCall {
    /// Target contract.
    pub address: Address,
    /// Sending account.
    pub actor: Option<Address>,
    /// Entry point.
    pub method: String,
    /// Call arguments.
    pub args: Vec<AbiValue>,
}

enum Effect {
    Deploy { address: Address, code: String },
    Call {
        address: Address,
        args: Vec<AbiValue>,
    },
}

#[derive(Default)]
struct RegistryTable {
    order: Vec<Address>,
    entries: HashMap<Address, Vec<Option<AbiValue>>>,
}

#[derive(Default)]
struct LedgerState {
    nonce: u64,
    block_number: u64,
    code: HashMap<Address, String>,
    deployed: Vec<Address>,
    denied: HashSet<Address>,
    tables: HashMap<Address, RegistryTable>,
    pending: Vec<(TxHandle, Effect)>,
    receipts: HashMap<TxHandle, ConfirmedTransaction>,
    failing_lookups: HashMap<Address, String>,
    submitted: Vec<SubmittedCall>,
    manual_mining: bool,
    unavailable: bool,
}

impl LedgerState {
    fn check_available(&self) -> Result<(), LedgerError> {
        if self.unavailable {
            return Err(LedgerError::Unavailable("ledger node offline".to_string()));
        }
        Ok(())
    }

    fn check_readable(&self, address: &Address) -> Result<(), LedgerError> {
        self.check_available()?;
        if self.denied.contains(address) {
            return Err(LedgerError::AccessDenied(address.clone()));
        }
        if !self.code.contains_key(address) {
            return Err(LedgerError::NotFound(address.clone()));
        }
        Ok(())
    }

    fn next_nonce(&mut self) -> u64 {
        self.nonce += 1;
        self.nonce
    }

    fn submit(&mut self, nonce: u64, effect: Effect) -> TxHandle {
        let handle = TxHandle::new(format!("0x{}", hex::encode(digest(b"tx", nonce))));
        if self.manual_mining {
            self.pending.push((handle.clone(), effect));
        } else {
            self.apply(handle.clone(), effect);
        }
        handle
    }

    fn apply(&mut self, handle: TxHandle, effect: Effect) {
        self.block_number += 1;
        let contract_address = match effect {
            Effect::Deploy { address, code } => {
                self.code.insert(address.clone(), code);
                self.deployed.push(address.clone());
                Some(address)
            }
            Effect::Call { address, args } => {
                self.apply_register(&address, args);
                None
            }
        };
        self.receipts.insert(
            handle.clone(),
            ConfirmedTransaction {
                handle,
                contract_address,
                block_number: self.block_number,
            },
        );
    }

    fn apply_register(&mut self, registry: &Address, args: Vec<AbiValue>) {
        let Some(id) = args.first().and_then(AbiValue::as_address) else {
            return;
        };
        let table = self.tables.entry(registry.clone()).or_default();
        if !table.entries.contains_key(&id) {
            table.order.push(id.clone());
        }
        table
            .entries
            .insert(id, args.into_iter().map(Some).collect());
    }
}

fn digest(tag: &[u8], nonce: u64) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(tag);
    hasher.update(nonce.to_be_bytes());
    hasher.finalize().into()
}

fn contract_address(nonce: u64) -> Address {
    let hash = digest(b"create", nonce);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(&bytes)
}

/// The tuple the registry returns for an id it has never seen.
fn unregistered_entry() -> Vec<Option<AbiValue>> {
    vec![
        Some(AbiValue::Address(Address::from_bytes(&[0u8; 20]))),
        Some(AbiValue::String(String::new())),
        Some(AbiValue::String(String::new())),
        Some(AbiValue::String(String::new())),
        Some(AbiValue::String(String::new())),
        Some(AbiValue::Uint(U256::zero())),
    ]
}

/// In-memory ledger for testing.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place contract code at `address` without a transaction.
    pub fn install_contract(&self, address: Address, code: &str) {
        self.state.lock().code.insert(address, code.to_string());
    }

    /// Make `address` unreadable from this node (private contract).
    pub fn deny_access(&self, address: Address) {
        self.state.lock().denied.insert(address);
    }

    /// Make `getById` for `id` fail with `reason`.
    pub fn fail_lookup(&self, id: Address, reason: &str) {
        self.state
            .lock()
            .failing_lookups
            .insert(id, reason.to_string());
    }

    /// Store a raw `getById` result for `id` in `registry`, indexing the id.
    pub fn set_raw_entry(&self, registry: &Address, id: Address, values: Vec<Option<AbiValue>>) {
        let mut state = self.state.lock();
        let table = state.tables.entry(registry.clone()).or_default();
        if !table.entries.contains_key(&id) {
            table.order.push(id.clone());
        }
        table.entries.insert(id, values);
    }

    /// Hold transactions as pending until [`InMemoryLedger::mine_pending`].
    pub fn set_manual_mining(&self, manual: bool) {
        self.state.lock().manual_mining = manual;
    }

    /// Mine all pending transactions. Returns how many were mined.
    pub fn mine_pending(&self) -> usize {
        let mut state = self.state.lock();
        let pending = std::mem::take(&mut state.pending);
        let count = pending.len();
        for (handle, effect) in pending {
            state.apply(handle, effect);
        }
        count
    }

    /// Simulate a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    /// State-changing calls accepted so far.
    #[must_use]
    pub fn submitted_calls(&self) -> Vec<SubmittedCall> {
        self.state.lock().submitted.clone()
    }

    /// Addresses of contracts deployed through `create`, in order.
    #[must_use]
    pub fn deployments(&self) -> Vec<Address> {
        self.state.lock().deployed.clone()
    }

    /// Returns true if code exists at `address`.
    #[must_use]
    pub fn has_code(&self, address: &Address) -> bool {
        self.state.lock().code.contains_key(address)
    }
}

#[async_trait]
impl LedgerExecutor for InMemoryLedger {
    async fn create(&self, code: &str) -> Result<TxHandle, LedgerError> {
        let mut state = self.state.lock();
        state.check_available()?;
        let nonce = state.next_nonce();
        let effect = Effect::Deploy {
            address: contract_address(nonce),
            code: code.to_string(),
        };
        Ok(state.submit(nonce, effect))
    }

    async fn transact(
        &self,
        address: &Address,
        abi: &ContractAbi,
        actor: Option<&Address>,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<TxHandle, LedgerError> {
        let mut state = self.state.lock();
        state.check_readable(address)?;
        if abi.function(method).is_none() || method != REGISTER {
            return Err(LedgerError::Rejected(format!(
                "{method} is not a state-changing registry method"
            )));
        }

        state.submitted.push(SubmittedCall {
            address: address.clone(),
            actor: actor.cloned(),
            method: method.to_string(),
            args: args.clone(),
        });
        let nonce = state.next_nonce();
        let effect = Effect::Call {
            address: address.clone(),
            args,
        };
        Ok(state.submit(nonce, effect))
    }

    async fn read(
        &self,
        address: &Address,
        abi: &ContractAbi,
        _actor: Option<&Address>,
        method: &str,
        args: Vec<AbiValue>,
    ) -> Result<Vec<Option<AbiValue>>, LedgerError> {
        let state = self.state.lock();
        state.check_readable(address)?;
        if abi.function(method).is_none() {
            return Err(LedgerError::Rejected(format!("{method} not in interface")));
        }

        let table = state.tables.get(address);
        match method {
            GET_BY_ID => {
                let id = args
                    .first()
                    .and_then(AbiValue::as_address)
                    .ok_or_else(|| LedgerError::Rejected("getById requires an id".to_string()))?;
                if let Some(reason) = state.failing_lookups.get(&id) {
                    return Err(LedgerError::Rejected(reason.clone()));
                }
                Ok(table
                    .and_then(|t| t.entries.get(&id).cloned())
                    .unwrap_or_else(unregistered_entry))
            }
            LIST_ADDRS => {
                let ids = table
                    .map(|t| t.order.iter().cloned().map(AbiValue::Address).collect())
                    .unwrap_or_default();
                Ok(vec![Some(AbiValue::Array(ids))])
            }
            other => Err(LedgerError::Rejected(format!("{other} is not readable"))),
        }
    }

    async fn get(&self, address: &Address) -> Result<ContractInfo, LedgerError> {
        let state = self.state.lock();
        state.check_readable(address)?;
        Ok(ContractInfo {
            address: address.clone(),
            code_size: state.code.get(address).map_or(0, String::len),
        })
    }
}

#[async_trait]
impl ReceiptSource for InMemoryLedger {
    async fn receipt(
        &self,
        handle: &TxHandle,
    ) -> Result<Option<ConfirmedTransaction>, LedgerError> {
        let state = self.state.lock();
        state.check_available()?;
        if let Some(receipt) = state.receipts.get(handle) {
            return Ok(Some(receipt.clone()));
        }
        if state.pending.iter().any(|(pending, _)| pending == handle) {
            return Ok(None);
        }
        Err(LedgerError::UnknownTransaction(handle.clone()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::decode_registry_entry;

    const REGISTRY_ABI: &str = include_str!("../../contracts/ContractRegistry.abi.json");

    fn abi() -> ContractAbi {
        ContractAbi::from_json(REGISTRY_ABI).unwrap()
    }

    async fn deployed_registry(ledger: &InMemoryLedger) -> Address {
        let handle = ledger.create("contract Registry {}").await.unwrap();
        ledger
            .receipt(&handle)
            .await
            .unwrap()
            .unwrap()
            .contract_address
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_mines_immediately() {
        let ledger = InMemoryLedger::new();
        let registry = deployed_registry(&ledger).await;

        assert!(ledger.has_code(&registry));
        assert_eq!(ledger.deployments(), vec![registry.clone()]);
        assert!(ledger.get(&registry).await.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_deployments() {
        let ledger = InMemoryLedger::new();
        let a = deployed_registry(&ledger).await;
        let b = deployed_registry(&ledger).await;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_manual_mining() {
        let ledger = InMemoryLedger::new();
        ledger.set_manual_mining(true);

        let handle = ledger.create("code").await.unwrap();
        assert_eq!(ledger.receipt(&handle).await.unwrap(), None);

        assert_eq!(ledger.mine_pending(), 1);
        assert!(ledger.receipt(&handle).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unknown_receipt() {
        let ledger = InMemoryLedger::new();
        let result = ledger.receipt(&TxHandle::new("0xdead")).await;
        assert!(matches!(result, Err(LedgerError::UnknownTransaction(_))));
    }

    #[tokio::test]
    async fn test_register_then_get_by_id() {
        let ledger = InMemoryLedger::new();
        let registry = deployed_registry(&ledger).await;
        let abi = abi();

        let args = vec![
            AbiValue::Address(Address::new("0x01")),
            AbiValue::String("Token".into()),
            AbiValue::String("[]".into()),
            AbiValue::String("contract Token {}".into()),
            AbiValue::String("solidity".into()),
            AbiValue::Uint(U256::from(10u64)),
        ];
        ledger
            .transact(&registry, &abi, None, REGISTER, args)
            .await
            .unwrap();

        let id = AbiValue::Address(Address::new("0x01"));
        let raw = ledger
            .read(&registry, &abi, None, GET_BY_ID, vec![id.clone()])
            .await
            .unwrap();
        let record = decode_registry_entry(&raw).unwrap().unwrap();
        assert_eq!(record.name, "Token");

        let index = ledger
            .read(&registry, &abi, None, LIST_ADDRS, vec![])
            .await
            .unwrap();
        assert_eq!(index, vec![Some(AbiValue::Array(vec![id]))]);
    }

    #[tokio::test]
    async fn test_unknown_id_returns_sentinel_tuple() {
        let ledger = InMemoryLedger::new();
        let registry = deployed_registry(&ledger).await;

        let id = AbiValue::Address(Address::new("0xAB"));
        let raw = ledger
            .read(&registry, &abi(), None, GET_BY_ID, vec![id])
            .await
            .unwrap();
        assert_eq!(raw.len(), 6);
        assert_eq!(decode_registry_entry(&raw).unwrap(), None);
    }

    #[tokio::test]
    async fn test_access_denied_and_not_found() {
        let ledger = InMemoryLedger::new();
        let private = Address::new("0xP");
        ledger.install_contract(private.clone(), "code");
        ledger.deny_access(private.clone());

        assert!(matches!(
            ledger.get(&private).await,
            Err(LedgerError::AccessDenied(_))
        ));
        assert!(matches!(
            ledger.get(&Address::new("0xnothing")).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable() {
        let ledger = InMemoryLedger::new();
        ledger.set_unavailable(true);
        assert!(matches!(
            ledger.create("code").await,
            Err(LedgerError::Unavailable(_))
        ));
    }
}
