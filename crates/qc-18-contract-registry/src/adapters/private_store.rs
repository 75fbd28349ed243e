//! # Private Contract Stores
//!
//! Off-ledger record stores. `InMemoryPrivateStore` is for tests;
//! `FileBackedPrivateStore` persists a JSON document on disk for single-node
//! deployments without a database.

use crate::domain::entities::ContractRecord;
use crate::domain::value_objects::Address;
use crate::errors::StoreError;
use crate::ports::outbound::PrivateContractStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::info;

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-memory private store for testing.
#[derive(Debug, Default)]
pub struct InMemoryPrivateStore {
    records: RwLock<HashMap<Address, ContractRecord>>,
    unavailable: RwLock<bool>,
    saves: RwLock<u64>,
}

impl InMemoryPrivateStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the save counter.
    pub fn insert(&self, record: ContractRecord) {
        self.records.write().insert(record.address.clone(), record);
    }

    /// Make every operation fail with an I/O error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn save_count(&self) -> u64 {
        *self.saves.read()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if *self.unavailable.read() {
            return Err(StoreError::Io("private store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PrivateContractStore for InMemoryPrivateStore {
    async fn save(&self, record: &ContractRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.records
            .write()
            .insert(record.address.clone(), record.clone());
        *self.saves.write() += 1;
        Ok(())
    }

    async fn get_by_id(&self, id: &Address) -> Result<Option<ContractRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().get(id).cloned())
    }

    async fn list_ids(&self) -> Result<Vec<Address>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().keys().cloned().collect())
    }
}

// =============================================================================
// FILE-BACKED STORE
// =============================================================================

/// File-backed private store.
///
/// Keeps all records in memory and rewrites the whole JSON document on every
/// save, atomically via a temp file.
pub struct FileBackedPrivateStore {
    records: RwLock<BTreeMap<Address, ContractRecord>>,
    path: PathBuf,
}

impl FileBackedPrivateStore {
    /// Open the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store; an unreadable or corrupt file is an
    /// error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let records = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<BTreeMap<Address, ContractRecord>>(&bytes)
                .map_err(|e| StoreError::Serialization(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        if !records.is_empty() {
            info!(
                count = records.len(),
                path = %path.display(),
                "Loaded private contracts"
            );
        }

        Ok(Self {
            records: RwLock::new(records),
            path,
        })
    }

    fn save_to_file(&self, records: &BTreeMap<Address, ContractRecord>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Write atomically via temp file
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, bytes).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl PrivateContractStore for FileBackedPrivateStore {
    async fn save(&self, record: &ContractRecord) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let previous = records.insert(record.address.clone(), record.clone());
        if let Err(e) = self.save_to_file(&records) {
            // Keep memory consistent with disk
            match previous {
                Some(prev) => records.insert(prev.address.clone(), prev),
                None => records.remove(&record.address),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &Address) -> Result<Option<ContractRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn list_ids(&self) -> Result<Vec<Address>, StoreError> {
        Ok(self.records.read().keys().cloned().collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{CodeKind, Visibility};

    fn record(addr: &str, group: &str) -> ContractRecord {
        ContractRecord {
            address: Address::new(addr),
            name: "Escrow".into(),
            interface_description: "[]".into(),
            source: "contract Escrow {}".into(),
            code_kind: CodeKind::Solidity,
            created_at: 1_000,
            visibility: Visibility::from_scope(group),
        }
    }

    #[tokio::test]
    async fn test_in_memory_save_and_get() {
        let store = InMemoryPrivateStore::new();
        store.save(&record("0x01", "bankA")).await.unwrap();

        let found = store
            .get_by_id(&Address::new("0x01"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.visibility_scope(), "bankA");
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_unavailable() {
        let store = InMemoryPrivateStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.save(&record("0x01", "bankA")).await,
            Err(StoreError::Io(_))
        ));
        assert!(store.list_ids().await.is_err());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_file_backed_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("private").join("contracts.json");

        {
            let store = FileBackedPrivateStore::open(&path).unwrap();
            store.save(&record("0x01", "bankA")).await.unwrap();
            store.save(&record("0x02", "bankB")).await.unwrap();
        }

        let reopened = FileBackedPrivateStore::open(&path).unwrap();
        let mut ids = reopened.list_ids().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![Address::new("0x01"), Address::new("0x02")]);

        let found = reopened
            .get_by_id(&Address::new("0x02"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.visibility, Visibility::from_scope("bankB"));
    }

    #[test]
    fn test_file_backed_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contracts.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(
            FileBackedPrivateStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_file_backed_failed_save_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("private");
        let store = FileBackedPrivateStore::open(parent.join("contracts.json")).unwrap();

        // Parent "directory" becomes a regular file
        std::fs::write(&parent, "x").unwrap();

        assert!(store.save(&record("0x01", "bankA")).await.is_err());
        assert!(store
            .get_by_id(&Address::new("0x01"))
            .await
            .unwrap()
            .is_none());
    }
}
