//! Fixed type tables shared by the generators.
//!
//! This module maps:
//! - GraphQL scalars used in entity schemas to TypeScript types
//! - Solidity ABI type families to TypeScript types

use lazy_static::lazy_static;
use regex::Regex;

/// GraphQL scalar name to TypeScript type. `BigInt`, `BigDecimal` and
/// `Bytes` travel as strings.
pub const SCALAR_TYPES: &[(&str, &str)] = &[
    ("ID", "string"),
    ("Boolean", "boolean"),
    ("Int", "number"),
    ("String", "string"),
    ("BigInt", "string"),
    ("BigDecimal", "string"),
    ("Bytes", "string"),
];

/// Solidity type family (width suffix removed) to TypeScript type.
pub const ABI_FAMILY_TYPES: &[(&str, &str)] = &[
    ("bool", "boolean"),
    ("address", "string"),
    ("string", "string"),
    ("int", "BigNumber"),
    ("uint", "BigNumber"),
    ("bytes", "Bytes"),
];

/// Placeholder for ABI parameters whose family has no mapping.
pub const UNKNOWN_TYPE: &str = "unknown";

lazy_static! {
    static ref WIDTH_SUFFIX: Regex = Regex::new(r"[0-9]+$").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Whether `name` can be used as a TypeScript identifier and, since source
/// names also become file names, as a single path component.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Get the TypeScript type for a GraphQL scalar.
pub fn ts_type_for_scalar(scalar: &str) -> Option<&'static str> {
    lookup(SCALAR_TYPES, scalar)
}

/// Get the TypeScript type for an ABI base type such as `uint256` or `bytes32`.
pub fn ts_type_for_abi_base_type(base_type: &str) -> Option<&'static str> {
    lookup(ABI_FAMILY_TYPES, &abi_family(base_type))
}

/// Strip the trailing bit/byte width: `uint256` -> `uint`, `bytes32` -> `bytes`.
pub fn abi_family(base_type: &str) -> String {
    WIDTH_SUFFIX.replace(base_type, "").into_owned()
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, ts)| *ts)
}
