//! # Registry Configuration
//!
//! Where the registry address is read from and how long deployment waits.

use crate::ports::outbound::Environment;
use std::path::PathBuf;
use std::time::Duration;

/// Default variable overriding the registry address.
pub const DEFAULT_ENV_OVERRIDE_VAR: &str = "QC_REGISTRY_ADDR";

/// Default variable naming the shared address file.
pub const DEFAULT_SHARED_CONFIG_VAR: &str = "QC_SHARED_CONFIG";

/// Configuration for the Contract Registry service.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Environment variable whose non-blank value overrides every other
    /// address source.
    pub env_override_var: String,

    /// Environment variable holding the shared file path, consulted when
    /// `shared_config_path` is not set.
    pub shared_config_var: String,

    /// Shared address file. `None` disables the shared file.
    pub shared_config_path: Option<PathBuf>,

    /// Local configuration file (durable, authoritative for this process).
    pub local_config_path: PathBuf,

    /// Upper bound on the deployment confirmation wait (default: 30s).
    pub confirmation_timeout: Duration,

    /// Receipt polling interval during the confirmation wait (default: 200ms).
    pub poll_interval: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            env_override_var: DEFAULT_ENV_OVERRIDE_VAR.to_string(),
            shared_config_var: DEFAULT_SHARED_CONFIG_VAR.to_string(),
            shared_config_path: None,
            local_config_path: PathBuf::from("./data/registry.properties"),
            confirmation_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the shared file path from the environment, unless already set.
    #[must_use]
    pub fn with_environment(mut self, env: &dyn Environment) -> Self {
        if self.shared_config_path.is_none() {
            self.shared_config_path = env
                .var(&self.shared_config_var)
                .filter(|v| !v.trim().is_empty())
                .map(|v| PathBuf::from(v.trim()));
        }
        self
    }

    /// Set the shared address file.
    #[must_use]
    pub fn with_shared_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.shared_config_path = Some(path.into());
        self
    }

    /// Set the local configuration file.
    #[must_use]
    pub fn with_local_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_config_path = path.into();
        self
    }

    /// Set the confirmation timeout.
    #[must_use]
    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Set the receipt polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
