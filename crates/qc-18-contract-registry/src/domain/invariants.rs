//! # Domain Invariants
//!
//! Guards the registration router and the list merger rely on.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | The registry never registers itself | `is_self_registration()` |
//! | Private records never reach the public registry | `routes_to_private_store()` |
//! | Listings are ordered by creation time | `is_ordered_by_creation()` |

use crate::domain::entities::ContractRecord;
use crate::domain::value_objects::Address;

/// Name reserved for the registry contract itself (case-insensitive).
pub const REGISTRY_CONTRACT_NAME: &str = "ContractRegistry";

/// True if `name` is the reserved registry name, in any case.
#[must_use]
pub fn is_reserved_registry_name(name: &str) -> bool {
    name.eq_ignore_ascii_case(REGISTRY_CONTRACT_NAME)
}

/// True if a registration would record the registry contract in itself.
#[must_use]
pub fn is_self_registration(name: &str, id: &Address, registry: &Address) -> bool {
    is_reserved_registry_name(name) || id == registry
}

/// True if a record with this scope belongs in the private store only.
#[must_use]
pub fn routes_to_private_store(visibility_scope: &str) -> bool {
    !visibility_scope.trim().is_empty()
}

/// True if records are non-decreasing by `created_at`.
#[must_use]
pub fn is_ordered_by_creation(records: &[ContractRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| pair[0].created_at <= pair[1].created_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_name_any_case() {
        assert!(is_reserved_registry_name("ContractRegistry"));
        assert!(is_reserved_registry_name("contractregistry"));
        assert!(is_reserved_registry_name("CONTRACTREGISTRY"));
        assert!(!is_reserved_registry_name("ContractRegistry2"));
    }

    #[test]
    fn test_self_registration_by_address() {
        let registry = Address::new("0xRC");
        let other = Address::new("0x01");
        assert!(is_self_registration("Anything", &registry, &registry));
        assert!(!is_self_registration("Token", &other, &registry));
    }

    #[test]
    fn test_private_routing() {
        assert!(routes_to_private_store("bankA"));
        assert!(!routes_to_private_store(""));
        assert!(!routes_to_private_store("  "));
    }
}
