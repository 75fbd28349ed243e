//! # Error Types
//!
//! All error types for contract registry resolution.
//!
//! "Not found" is never an error here: lookups return `Option`, and the
//! variants below are reserved for storage, configuration and ledger failures.

use crate::domain::value_objects::{Address, TxHandle};
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by the ledger execution and confirmation collaborators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No contract code exists at the address.
    #[error("no contract code at address {0}")]
    NotFound(Address),

    /// The contract exists but this node is not allowed to read it.
    #[error("access denied for contract {0}")]
    AccessDenied(Address),

    /// The ledger refused the call.
    #[error("call rejected: {0}")]
    Rejected(String),

    /// Confirmation did not arrive within the bounded wait.
    #[error("confirmation timeout after {timeout_ms}ms")]
    Timeout {
        /// The bound that elapsed.
        timeout_ms: u64,
    },

    /// Confirmation wait was interrupted (shutdown requested).
    #[error("confirmation wait interrupted")]
    Interrupted,

    /// Connection to the ledger node lost.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The transaction handle is not known to the ledger.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHandle),
}

impl LedgerError {
    /// Returns true if the error ended a confirmation wait without a verdict.
    #[must_use]
    pub fn is_wait_abort(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Interrupted)
    }
}

// =============================================================================
// PRIVATE STORE ERRORS
// =============================================================================

/// Errors from the private (local, off-ledger) contract store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("private store I/O error: {0}")]
    Io(String),

    /// Stored bytes could not be encoded or decoded.
    #[error("private store serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// CONFIGURATION ERRORS
// =============================================================================

/// Errors reading or writing address configuration files.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O failed.
    #[error("config I/O error at {}: {message}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Operation-level failures raised to callers of the registry service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Private store read or write failed.
    #[error("private store error: {0}")]
    PrivateStore(#[from] StoreError),

    /// Ledger call failed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Local configuration could not be read or written.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Stored code kind is not one of the known kinds.
    #[error("unknown code kind: {0:?}")]
    UnknownCodeKind(String),

    /// A registry call returned a value of the wrong shape.
    #[error("malformed result from {method}: {reason}")]
    MalformedResult {
        /// Registry entry point.
        method: &'static str,
        /// What was wrong.
        reason: String,
    },

    /// The method is not part of the registry interface description.
    #[error("method not in registry interface: {0}")]
    UnknownMethod(String),

    /// Wrong number of call arguments for the method.
    #[error("argument count mismatch for {method}: expected {expected}, got {actual}")]
    ArgumentCount {
        /// Called method.
        method: String,
        /// Declared inputs.
        expected: usize,
        /// Supplied arguments.
        actual: usize,
    },

    /// Interface description JSON could not be parsed.
    #[error("invalid interface description: {0}")]
    InvalidAbi(String),
}

impl RegistryError {
    /// Returns true if this is a configuration or storage problem rather than
    /// a ledger or decode failure.
    #[must_use]
    pub fn is_storage_problem(&self) -> bool {
        matches!(self, Self::PrivateStore(_) | Self::Config(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err = LedgerError::Timeout { timeout_ms: 200 };
        assert_eq!(err.to_string(), "confirmation timeout after 200ms");

        let err = LedgerError::NotFound(Address::new("0xabc"));
        assert_eq!(err.to_string(), "no contract code at address 0xabc");
    }

    #[test]
    fn test_wait_abort() {
        assert!(LedgerError::Interrupted.is_wait_abort());
        assert!(LedgerError::Timeout { timeout_ms: 1 }.is_wait_abort());
        assert!(!LedgerError::Rejected("nope".into()).is_wait_abort());
    }

    #[test]
    fn test_store_error_conversion() {
        let err: RegistryError = StoreError::Io("disk gone".into()).into();
        assert!(matches!(err, RegistryError::PrivateStore(_)));
        assert!(err.is_storage_problem());
    }

    #[test]
    fn test_ledger_error_is_not_storage_problem() {
        let err: RegistryError = LedgerError::Unavailable("down".into()).into();
        assert!(!err.is_storage_problem());
    }

    #[test]
    fn test_config_error_display_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io("/etc/registry.properties", &io);
        assert!(err.to_string().contains("/etc/registry.properties"));
        assert!(err.to_string().contains("denied"));
    }
}
