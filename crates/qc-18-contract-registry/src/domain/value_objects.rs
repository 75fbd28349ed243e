//! # Value Objects
//!
//! Immutable domain primitives for contract registry resolution.
//! These types represent concepts that are defined by their value, not identity.

use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export U256 from primitive-types for ABI integers
pub use primitive_types::U256;

// =============================================================================
// ADDRESS
// =============================================================================

/// An opaque ledger-assigned identifier.
///
/// Kept exactly as the ledger renders it. The registry compares addresses for
/// equality but never interprets their bytes, except to detect the all-zero
/// sentinel the registry contract returns for unknown ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from its textual form.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses a configuration value. Blank values mean "not set".
    #[must_use]
    pub fn parse_non_blank(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Creates a `0x`-prefixed address from 20 raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the all-zero sentinel (`0x00`, `0x0000...0000`).
    #[must_use]
    pub fn is_zero_sentinel(&self) -> bool {
        let text = self.0.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        !digits.is_empty() && digits.bytes().all(|b| b == b'0')
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// TRANSACTION HANDLE
// =============================================================================

/// Handle of a submitted (not necessarily mined) ledger transaction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHandle(String);

impl TxHandle {
    /// Creates a handle from the ledger's transaction id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the transaction id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHandle({})", self.0)
    }
}

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CODE KIND
// =============================================================================

/// Kind of payload stored in a record's `source` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    /// Solidity source code.
    Solidity,
    /// Raw EVM bytecode.
    Binary,
}

impl CodeKind {
    /// Wire name, as passed to the registry's `register` entry point.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solidity => "solidity",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = RegistryError;

    /// Exact match on the wire name. Unknown values are an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solidity" => Ok(Self::Solidity),
            "binary" => Ok(Self::Binary),
            other => Err(RegistryError::UnknownCodeKind(other.to_string())),
        }
    }
}

// =============================================================================
// VISIBILITY
// =============================================================================

/// Where a record lives and whether this node can read it.
///
/// On the wire this is a single "visibility scope" string: empty for public,
/// a group name for private. `PrivateOpaque` is derived at listing time and
/// renders as `"private"`; it is never written to a store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Visibility {
    /// Registered on the public ledger registry.
    Public,
    /// Held in the private store, restricted to `group`.
    Private {
        /// Restricted participant group.
        group: String,
    },
    /// Known to exist, but this node cannot read the contract.
    PrivateOpaque,
}

impl Visibility {
    /// Scope string rendered for [`Visibility::PrivateOpaque`].
    pub const OPAQUE_MARKER: &'static str = "private";

    /// Classifies a stored scope string.
    #[must_use]
    pub fn from_scope(scope: &str) -> Self {
        if scope.trim().is_empty() {
            Self::Public
        } else {
            Self::Private {
                group: scope.to_string(),
            }
        }
    }

    /// Renders the wire scope string.
    #[must_use]
    pub fn scope(&self) -> &str {
        match self {
            Self::Public => "",
            Self::Private { group } => group,
            Self::PrivateOpaque => Self::OPAQUE_MARKER,
        }
    }

    /// Returns true unless the record is public.
    #[must_use]
    pub fn is_private(&self) -> bool {
        !matches!(self, Self::Public)
    }

    /// Returns the restricted group, when readable.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Private { group } => Some(group),
            _ => None,
        }
    }
}

impl From<String> for Visibility {
    fn from(scope: String) -> Self {
        Self::from_scope(&scope)
    }
}

impl From<Visibility> for String {
    fn from(visibility: Visibility) -> Self {
        visibility.scope().to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinel() {
        assert!(Address::new("0x00").is_zero_sentinel());
        let zero = Address::new("0x0000000000000000000000000000000000000000");
        assert!(zero.is_zero_sentinel());
        assert!(Address::new("000").is_zero_sentinel());
        assert!(!Address::new("0x").is_zero_sentinel());
        assert!(!Address::new("0x01").is_zero_sentinel());
        assert!(!Address::new("").is_zero_sentinel());
    }

    #[test]
    fn test_parse_non_blank() {
        assert_eq!(Address::parse_non_blank("   "), None);
        assert_eq!(
            Address::parse_non_blank(" 0xabc \n"),
            Some(Address::new("0xabc"))
        );
    }

    #[test]
    fn test_from_bytes() {
        let addr = Address::from_bytes(&[0xAB; 20]);
        assert_eq!(addr.as_str().len(), 42);
        assert!(addr.as_str().starts_with("0xabab"));
    }

    #[test]
    fn test_code_kind_parse() {
        assert_eq!("solidity".parse(), Ok(CodeKind::Solidity));
        assert_eq!("binary".parse(), Ok(CodeKind::Binary));

        let err = "vyper".parse::<CodeKind>().unwrap_err();
        assert_eq!(err, RegistryError::UnknownCodeKind("vyper".to_string()));

        // No silent case folding
        assert!("Solidity".parse::<CodeKind>().is_err());
    }

    #[test]
    fn test_visibility_from_scope() {
        assert_eq!(Visibility::from_scope(""), Visibility::Public);
        assert_eq!(Visibility::from_scope("  "), Visibility::Public);
        assert_eq!(
            Visibility::from_scope("bankA"),
            Visibility::Private {
                group: "bankA".into()
            }
        );
    }

    #[test]
    fn test_visibility_scope_rendering() {
        assert_eq!(Visibility::Public.scope(), "");
        assert_eq!(Visibility::PrivateOpaque.scope(), "private");
        assert!(Visibility::PrivateOpaque.is_private());
        assert_eq!(Visibility::PrivateOpaque.group(), None);
    }

    #[test]
    fn test_visibility_serde_as_scope_string() {
        let json = serde_json::to_string(&Visibility::from_scope("bankA")).unwrap();
        assert_eq!(json, "\"bankA\"");

        let back: Visibility = serde_json::from_str("\"\"").unwrap();
        assert_eq!(back, Visibility::Public);
    }
}
