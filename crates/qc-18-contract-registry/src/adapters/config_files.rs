//! # Address Configuration Files
//!
//! - `PropertiesConfigStore`: the node's own configuration file (durable,
//!   authoritative for this process)
//! - `SharedAddressFile`: the file co-located nodes use to converge on one
//!   registry address (best-effort, no locking, last writer wins)
//! - `InMemoryConfigStore`: local configuration for tests

use crate::domain::properties;
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use crate::ports::outbound::{LocalConfigStore, SharedAddressSource};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Key holding the registry address in both files.
pub const REGISTRY_ADDRESS_KEY: &str = "contract.registry.addr";

fn read_entries(path: &Path) -> Result<Option<BTreeMap<String, String>>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(properties::parse(&text))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::io(path, &e)),
    }
}

/// Read-modify-write of one key, preserving the others.
fn write_key(path: &Path, key: &str, value: &str, atomic: bool) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, &e))?;
    }

    // An unreadable existing file is replaced rather than blocking the write
    let mut entries = read_entries(path).ok().flatten().unwrap_or_default();
    entries.insert(key.to_string(), value.to_string());
    let text = properties::render(&entries, Some("Quantum-Chain contract registry"));

    if atomic {
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, text).map_err(|e| ConfigError::io(&temp_path, &e))?;
        std::fs::rename(&temp_path, path).map_err(|e| ConfigError::io(path, &e))
    } else {
        std::fs::write(path, text).map_err(|e| ConfigError::io(path, &e))
    }
}

// =============================================================================
// LOCAL CONFIGURATION
// =============================================================================

/// Local configuration file holding the registry address.
#[derive(Debug, Clone)]
pub struct PropertiesConfigStore {
    path: PathBuf,
}

impl PropertiesConfigStore {
    /// Store backed by the file at `path` (created on first save).
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalConfigStore for PropertiesConfigStore {
    fn load(&self) -> Result<Option<Address>, ConfigError> {
        let Some(entries) = read_entries(&self.path)? else {
            debug!(path = %self.path.display(), "No local registry configuration");
            return Ok(None);
        };
        Ok(entries
            .get(REGISTRY_ADDRESS_KEY)
            .and_then(|v| Address::parse_non_blank(v)))
    }

    fn save(&self, address: &Address) -> Result<(), ConfigError> {
        debug!(address = %address, path = %self.path.display(), "Storing registry address");
        write_key(&self.path, REGISTRY_ADDRESS_KEY, address.as_str(), true)
    }
}

// =============================================================================
// SHARED FILE
// =============================================================================

/// Address file shared by nodes on the same machine.
///
/// With no path configured the file is disabled: reads yield nothing and
/// writes are no-ops.
#[derive(Debug, Clone, Default)]
pub struct SharedAddressFile {
    path: Option<PathBuf>,
}

impl SharedAddressFile {
    /// Shared file at `path`, or disabled.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// No shared file.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Path of the shared file, if configured.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SharedAddressSource for SharedAddressFile {
    fn read(&self) -> Option<Address> {
        let path = self.path.as_ref()?;
        match read_entries(path) {
            Ok(Some(entries)) => entries
                .get(REGISTRY_ADDRESS_KEY)
                .and_then(|v| Address::parse_non_blank(v)),
            Ok(None) => {
                debug!(path = %path.display(), "Shared config file not found");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error loading shared config");
                None
            }
        }
    }

    fn write(&self, address: &Address) -> Result<(), ConfigError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        write_key(path, REGISTRY_ADDRESS_KEY, address.as_str(), false)?;
        info!(
            address = %address,
            path = %path.display(),
            "Wrote registry address to shared location"
        );
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY LOCAL CONFIGURATION
// =============================================================================

/// Local configuration held in memory.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    address: RwLock<Option<Address>>,
    fail_saves: RwLock<bool>,
}

impl InMemoryConfigStore {
    /// Empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration preloaded with `address`.
    #[must_use]
    pub fn with_address(address: Address) -> Self {
        Self {
            address: RwLock::new(Some(address)),
            fail_saves: RwLock::new(false),
        }
    }

    /// Make subsequent saves fail (simulates a read-only disk).
    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.write() = fail;
    }

    /// Currently stored address.
    #[must_use]
    pub fn stored(&self) -> Option<Address> {
        self.address.read().clone()
    }
}

impl LocalConfigStore for InMemoryConfigStore {
    fn load(&self) -> Result<Option<Address>, ConfigError> {
        Ok(self.stored())
    }

    fn save(&self, address: &Address) -> Result<(), ConfigError> {
        if *self.fail_saves.read() {
            return Err(ConfigError::Io {
                path: PathBuf::from("<memory>"),
                message: "read-only configuration".to_string(),
            });
        }
        *self.address.write() = Some(address.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
