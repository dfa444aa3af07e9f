//! Core BusinessEntityId implementation
//!
//! A validated newtype over the canonical 12-digit identifier string. The
//! only ways to obtain one are parsing a string that already satisfies the
//! format invariant or deriving one from a trailing digit, so every value in
//! circulation is well-formed by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity_identity::constants::{is_valid_entity_id, ENTITY_ID_PREFIX};
use crate::error::ValidationError;

/// Canonical business-entity identifier
///
/// Invariant: exactly 12 decimal digits beginning with
/// [`ENTITY_ID_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessEntityId(String);

impl BusinessEntityId {
    /// Build an identifier from its trailing digit
    ///
    /// The digit is reduced modulo 10, so any derivation arithmetic in the
    /// allocator maps onto the namespace without a separate bounds check.
    pub fn from_digit(digit: u8) -> Self {
        Self(format!("{}{}", ENTITY_ID_PREFIX, digit % 10))
    }

    /// Parse an identifier, enforcing the format invariant
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if is_valid_entity_id(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidFormat {
                field: "entity_id".to_string(),
                value: raw.to_string(),
            })
        }
    }

    /// The canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The variable trailing digit
    pub fn trailing_digit(&self) -> u8 {
        // Invariant guarantees the last byte is an ASCII digit
        self.0.as_bytes()[self.0.len() - 1] - b'0'
    }
}

impl fmt::Display for BusinessEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BusinessEntityId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BusinessEntityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BusinessEntityId> for String {
    fn from(id: BusinessEntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for BusinessEntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_digit_produces_valid_ids() {
        for digit in 0..10u8 {
            let id = BusinessEntityId::from_digit(digit);
            assert!(is_valid_entity_id(id.as_str()));
            assert_eq!(id.trailing_digit(), digit);
        }
    }

    #[test]
    fn test_from_digit_wraps_modulo_namespace() {
        assert_eq!(BusinessEntityId::from_digit(13).trailing_digit(), 3);
        assert_eq!(BusinessEntityId::from_digit(250).trailing_digit(), 0);
    }

    #[test]
    fn test_parse_round_trip() {
        let id = BusinessEntityId::parse("000078678608").unwrap();
        assert_eq!(id.as_str(), "000078678608");
        assert_eq!(id.to_string(), "000078678608");
        assert_eq!(id.trailing_digit(), 8);
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for raw in ["", "00007867860", "0000786786099", "00007867861x", "123"] {
            let result = BusinessEntityId::parse(raw);
            assert!(result.is_err(), "expected {raw:?} to be rejected");
        }
    }

    #[test]
    fn test_from_str() {
        let id: BusinessEntityId = "000078678601".parse().unwrap();
        assert_eq!(id.trailing_digit(), 1);

        let err = "garbage".parse::<BusinessEntityId>();
        assert!(err.is_err());
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let id: BusinessEntityId = serde_json::from_str("\"000078678603\"").unwrap();
        assert_eq!(id.trailing_digit(), 3);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"000078678603\"");

        let bad: Result<BusinessEntityId, _> = serde_json::from_str("\"000078678699\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_ids_usable_as_map_keys() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(BusinessEntityId::from_digit(1));
        set.insert(BusinessEntityId::from_digit(2));
        set.insert(BusinessEntityId::from_digit(1));
        assert_eq!(set.len(), 2);
    }
}
