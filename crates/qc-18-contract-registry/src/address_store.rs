//! # Address Store
//!
//! Resolves where the registry contract lives.
//!
//! ## Precedence (low to high)
//!
//! 1. Base address: the local configuration default loaded at startup, or
//!    the last persisted / overridden address
//! 2. Shared file value, if non-blank
//! 3. Environment override, if non-blank
//!
//! Resolution is re-run on demand so a process picks up an address a sibling
//! published after startup.

use crate::adapters::config_files::{PropertiesConfigStore, SharedAddressFile};
use crate::config::RegistryConfig;
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use crate::ports::outbound::{Environment, LocalConfigStore, SharedAddressSource};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct AddressState {
    base: Option<Address>,
    resolved: Option<Address>,
}

/// Injected resolver for the registry's own address.
pub struct AddressStore {
    state: RwLock<AddressState>,
    local: Arc<dyn LocalConfigStore>,
    shared: Arc<dyn SharedAddressSource>,
    env: Arc<dyn Environment>,
    env_var: String,
}

impl AddressStore {
    /// Build a store, loading the local default once and resolving.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - the local configuration exists but is unreadable
    pub fn load(
        local: Arc<dyn LocalConfigStore>,
        shared: Arc<dyn SharedAddressSource>,
        env: Arc<dyn Environment>,
        env_var: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let base = local.load()?;
        if let Some(address) = &base {
            debug!(address = %address, "Loaded registry address from local configuration");
        }

        let store = Self {
            state: RwLock::new(AddressState {
                base,
                resolved: None,
            }),
            local,
            shared,
            env,
            env_var: env_var.into(),
        };
        store.resolve();
        Ok(store)
    }

    /// Build a file-backed store from configuration.
    pub fn from_config(
        config: &RegistryConfig,
        env: Arc<dyn Environment>,
    ) -> Result<Self, ConfigError> {
        Self::load(
            Arc::new(PropertiesConfigStore::new(&config.local_config_path)),
            Arc::new(SharedAddressFile::new(config.shared_config_path.clone())),
            env,
            config.env_override_var.clone(),
        )
    }

    /// The address currently in use, without re-reading any source.
    #[must_use]
    pub fn current(&self) -> Option<Address> {
        self.state.read().resolved.clone()
    }

    /// Re-apply the shared file and environment overrides over the base
    /// address and make the result current.
    pub fn resolve(&self) -> Option<Address> {
        let mut state = self.state.write();
        let mut resolved = state.base.clone();

        if let Some(shared) = self.shared.read() {
            debug!(address = %shared, "Registry address from shared file");
            resolved = Some(shared);
        }

        if let Some(from_env) = self
            .env
            .var(&self.env_var)
            .and_then(|v| Address::parse_non_blank(&v))
        {
            debug!(address = %from_env, var = %self.env_var, "Registry address from environment");
            resolved = Some(from_env);
        }

        if resolved != state.resolved {
            info!(
                previous = ?state.resolved,
                current = ?resolved,
                "Registry address resolved"
            );
        }
        state.resolved.clone_from(&resolved);
        resolved
    }

    /// Make `address` current and record it.
    ///
    /// The local write is authoritative and its failure is returned, with the
    /// in-memory address already updated. The shared write is best-effort.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - local configuration write failed
    pub fn persist(&self, address: &Address) -> Result<(), ConfigError> {
        {
            let mut state = self.state.write();
            state.base = Some(address.clone());
            state.resolved = Some(address.clone());
        }

        self.local.save(address)?;
        info!(address = %address, "Stored registry address in local configuration");

        if let Err(e) = self.shared.write(address) {
            warn!(
                address = %address,
                error = %e,
                "Could not write registry address to shared location"
            );
        }
        Ok(())
    }

    /// Replace the in-memory address for the life of the process.
    ///
    /// Nothing is written; shared and environment overrides still apply on
    /// the next [`AddressStore::resolve`].
    pub fn override_address(&self, address: Address) {
        info!(address = %address, "Registry address overridden at runtime");
        let mut state = self.state.write();
        state.base = Some(address.clone());
        state.resolved = Some(address);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::config_files::InMemoryConfigStore;
    use crate::adapters::environment::StaticEnvironment;
    use crate::config::DEFAULT_ENV_OVERRIDE_VAR;

    struct FixedShared(Option<Address>);

    impl SharedAddressSource for FixedShared {
        fn read(&self) -> Option<Address> {
            self.0.clone()
        }

        fn write(&self, _address: &Address) -> Result<(), ConfigError> {
            Err(ConfigError::Io {
                path: "/shared".into(),
                message: "read-only".into(),
            })
        }
    }

    fn store(local: Option<&str>, shared: Option<&str>, env: Option<&str>) -> AddressStore {
        let local = match local {
            Some(a) => InMemoryConfigStore::with_address(Address::new(a)),
            None => InMemoryConfigStore::new(),
        };
        let mut environment = StaticEnvironment::new();
        if let Some(value) = env {
            environment = environment.with(DEFAULT_ENV_OVERRIDE_VAR, value);
        }
        AddressStore::load(
            Arc::new(local),
            Arc::new(FixedShared(shared.map(Address::new))),
            Arc::new(environment),
            DEFAULT_ENV_OVERRIDE_VAR,
        )
        .unwrap()
    }

    #[test]
    fn test_precedence_env_wins() {
        let store = store(Some("0xA"), Some("0xB"), Some("0xC"));
        assert_eq!(store.resolve(), Some(Address::new("0xC")));
    }

    #[test]
    fn test_precedence_shared_over_local() {
        let store = store(Some("0xA"), Some("0xB"), None);
        assert_eq!(store.resolve(), Some(Address::new("0xB")));
    }

    #[test]
    fn test_precedence_local_only() {
        let store = store(Some("0xA"), None, None);
        assert_eq!(store.resolve(), Some(Address::new("0xA")));
        assert_eq!(store.current(), Some(Address::new("0xA")));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let store = store(Some("0xA"), None, Some("   "));
        assert_eq!(store.resolve(), Some(Address::new("0xA")));
    }

    #[test]
    fn test_nothing_configured() {
        let store = store(None, None, None);
        assert_eq!(store.resolve(), None);
        assert_eq!(store.current(), None);
    }

    #[test]
    fn test_load_resolves_immediately() {
        let store = store(None, Some("0xB"), None);
        assert_eq!(store.current(), Some(Address::new("0xB")));
    }

    #[test]
    fn test_persist_survives_shared_write_failure() {
        let local = Arc::new(InMemoryConfigStore::new());
        let store = AddressStore::load(
            local.clone(),
            Arc::new(FixedShared(None)),
            Arc::new(StaticEnvironment::new()),
            DEFAULT_ENV_OVERRIDE_VAR,
        )
        .unwrap();

        store.persist(&Address::new("0xRC")).unwrap();
        assert_eq!(local.stored(), Some(Address::new("0xRC")));
        assert_eq!(store.current(), Some(Address::new("0xRC")));
    }

    #[test]
    fn test_persist_local_failure_is_returned() {
        let local = Arc::new(InMemoryConfigStore::new());
        local.set_fail_saves(true);
        let store = AddressStore::load(
            local,
            Arc::new(FixedShared(None)),
            Arc::new(StaticEnvironment::new()),
            DEFAULT_ENV_OVERRIDE_VAR,
        )
        .unwrap();

        assert!(store.persist(&Address::new("0xRC")).is_err());
        // The process still uses the new address
        assert_eq!(store.current(), Some(Address::new("0xRC")));
    }

    #[test]
    fn test_override_is_not_persisted() {
        let local = Arc::new(InMemoryConfigStore::with_address(Address::new("0xA")));
        let store = AddressStore::load(
            local.clone(),
            Arc::new(FixedShared(None)),
            Arc::new(StaticEnvironment::new()),
            DEFAULT_ENV_OVERRIDE_VAR,
        )
        .unwrap();

        store.override_address(Address::new("0xD"));
        assert_eq!(store.current(), Some(Address::new("0xD")));
        assert_eq!(store.resolve(), Some(Address::new("0xD")));
        assert_eq!(local.stored(), Some(Address::new("0xA")));
    }

    #[test]
    fn test_env_still_overrides_runtime_override() {
        let store = store(Some("0xA"), None, Some("0xC"));
        store.override_address(Address::new("0xD"));
        assert_eq!(store.current(), Some(Address::new("0xD")));
        assert_eq!(store.resolve(), Some(Address::new("0xC")));
    }
}
