//! # Interface Descriptions and Call Values
//!
//! Typed call arguments, the parsed JSON interface description of a contract,
//! and the decode boundary for results returned by the registry contract.
//!
//! The registry signals "absent" with an all-zero address or a zero creation
//! time. Those sentinels are turned into `None` here and never leave this
//! module.

use crate::domain::entities::ContractRecord;
use crate::domain::value_objects::{Address, CodeKind, Visibility, U256};
use crate::errors::RegistryError;
use serde::Deserialize;

/// Registry entry point used for public registration.
pub const REGISTER: &str = "register";
/// Registry entry point resolving one id.
pub const GET_BY_ID: &str = "getById";
/// Registry entry point listing every registered id.
pub const LIST_ADDRS: &str = "listAddrs";

/// Number of elements in a `getById` result tuple.
pub const REGISTRY_ENTRY_ARITY: usize = 6;

// =============================================================================
// ABI VALUE
// =============================================================================

/// A single call argument or result element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    /// `address`
    Address(Address),
    /// `string`
    String(String),
    /// `uint256`
    Uint(U256),
    /// Dynamic array (`address[]` and friends).
    Array(Vec<AbiValue>),
}

impl AbiValue {
    /// Reads the value as an address. String values are accepted since some
    /// ledger clients render addresses as plain strings.
    #[must_use]
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(addr) => Some(addr.clone()),
            Self::String(s) => Some(Address::new(s.clone())),
            _ => None,
        }
    }

    /// Reads the value as a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the value as an unsigned integer.
    #[must_use]
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads the value as an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[AbiValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

// =============================================================================
// CONTRACT ABI
// =============================================================================

/// One parameter of a function.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AbiParam {
    /// Parameter name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Solidity type, e.g. `address`, `uint256`, `address[]`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A callable function of a contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiFunction {
    /// Function name.
    pub name: String,
    /// Input parameters, in call order.
    pub inputs: Vec<AbiParam>,
    /// Output parameters, in result order.
    pub outputs: Vec<AbiParam>,
    /// Read-only function.
    pub constant: bool,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
    #[serde(default)]
    constant: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

/// Parsed JSON interface description.
#[derive(Clone, Debug)]
pub struct ContractAbi {
    json: String,
    functions: Vec<AbiFunction>,
}

impl ContractAbi {
    /// Parses a JSON interface description.
    ///
    /// Only `function` entries are retained; constructors, events and
    /// fallbacks are accepted and ignored.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let entries: Vec<RawEntry> =
            serde_json::from_str(json).map_err(|e| RegistryError::InvalidAbi(e.to_string()))?;

        let mut functions = Vec::new();
        for entry in entries {
            if entry.kind != "function" {
                continue;
            }
            let name = entry
                .name
                .filter(|n| !n.is_empty())
                .ok_or_else(|| RegistryError::InvalidAbi("function entry without name".into()))?;
            functions.push(AbiFunction {
                name,
                inputs: entry.inputs,
                outputs: entry.outputs,
                constant: entry.constant,
            });
        }

        Ok(Self {
            json: json.to_string(),
            functions,
        })
    }

    /// The original JSON text.
    #[must_use]
    pub fn as_json(&self) -> &str {
        &self.json
    }

    /// All functions, in declaration order.
    #[must_use]
    pub fn functions(&self) -> &[AbiFunction] {
        &self.functions
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Checks that `method` exists and takes `args.len()` arguments.
    pub fn check_call(
        &self,
        method: &str,
        args: &[AbiValue],
    ) -> Result<&AbiFunction, RegistryError> {
        let function = self
            .function(method)
            .ok_or_else(|| RegistryError::UnknownMethod(method.to_string()))?;
        if function.inputs.len() != args.len() {
            return Err(RegistryError::ArgumentCount {
                method: method.to_string(),
                expected: function.inputs.len(),
                actual: args.len(),
            });
        }
        Ok(function)
    }
}

// =============================================================================
// REGISTRY RESULT DECODING
// =============================================================================

/// Decodes a `getById` result tuple
/// `(address, name, interfaceDescription, source, codeKind, createdAt)`.
///
/// Returns `Ok(None)` when the tuple is short, has a missing element, carries
/// the all-zero address, or has a zero creation time. A code kind that is not
/// recognised is an error.
pub fn decode_registry_entry(
    result: &[Option<AbiValue>],
) -> Result<Option<ContractRecord>, RegistryError> {
    if result.len() < REGISTRY_ENTRY_ARITY || result.iter().any(Option::is_none) {
        return Ok(None);
    }
    let values: Vec<&AbiValue> = result.iter().flatten().collect();

    let address = values[0]
        .as_address()
        .ok_or_else(|| malformed(GET_BY_ID, "element 0 is not an address"))?;
    let created = values[5]
        .as_uint()
        .ok_or_else(|| malformed(GET_BY_ID, "element 5 is not an integer"))?;
    if address.is_zero_sentinel() || created.is_zero() {
        return Ok(None);
    }
    if created > U256::from(u64::MAX) {
        return Err(malformed(GET_BY_ID, "creation time overflows u64"));
    }
    let created_at = created.low_u64();

    let text = |index: usize| -> Result<String, RegistryError> {
        values[index]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| malformed(GET_BY_ID, &format!("element {index} is not a string")))
    };

    let code_kind: CodeKind = text(4)?.parse()?;

    Ok(Some(ContractRecord {
        address,
        name: text(1)?,
        interface_description: text(2)?,
        source: text(3)?,
        code_kind,
        created_at,
        visibility: Visibility::Public,
    }))
}

/// Decodes a `listAddrs` result: a single array of addresses.
pub fn decode_address_index(result: &[Option<AbiValue>]) -> Result<Vec<Address>, RegistryError> {
    let items = result
        .first()
        .and_then(Option::as_ref)
        .and_then(AbiValue::as_array)
        .ok_or_else(|| malformed(LIST_ADDRS, "expected an address array"))?;

    items
        .iter()
        .map(|item| {
            item.as_address()
                .ok_or_else(|| malformed(LIST_ADDRS, "array element is not an address"))
        })
        .collect()
}

fn malformed(method: &'static str, reason: &str) -> RegistryError {
    RegistryError::MalformedResult {
        method,
        reason: reason.to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
