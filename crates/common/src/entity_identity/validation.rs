//! Dual-format identifier acceptance
//!
//! During the migration from numeric row ids to the canonical 12-digit
//! string form, callers may supply either. [`EntityRef`] makes the
//! distinction explicit at the boundary and normalizes to the string key
//! space the store actually uses. Legacy numeric ids stringify via plain
//! decimal conversion and are never reformatted into 12-digit form,
//! because the two id spaces are distinct.

use crate::entity_identity::constants::is_valid_entity_id;
use crate::entity_identity::entity_id::BusinessEntityId;
use crate::error::ValidationError;

/// A business-entity reference as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    /// Legacy numeric row id from the pre-migration schema
    Legacy(i64),
    /// Canonical 12-digit string identifier
    Canonical(BusinessEntityId),
}

impl EntityRef {
    /// Classify a raw string identifier
    ///
    /// Canonical form wins over numeric interpretation: every canonical id
    /// is also parseable as an integer, and treating it as legacy would
    /// strip its leading zeros.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if is_valid_entity_id(raw) {
            return Ok(Self::Canonical(BusinessEntityId::parse(raw)?));
        }

        if let Ok(numeric) = raw.parse::<i64>() {
            return Ok(Self::Legacy(numeric));
        }

        Err(ValidationError::InvalidFormat {
            field: "entity_id".to_string(),
            value: raw.to_string(),
        })
    }

    /// The exact string key used for store lookups
    pub fn lookup_key(&self) -> String {
        match self {
            Self::Legacy(numeric) => numeric.to_string(),
            Self::Canonical(id) => id.as_str().to_string(),
        }
    }

    /// Whether this reference is already in canonical form
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Canonical(_))
    }
}

impl From<i64> for EntityRef {
    fn from(numeric: i64) -> Self {
        Self::Legacy(numeric)
    }
}

impl From<BusinessEntityId> for EntityRef {
    fn from(id: BusinessEntityId) -> Self {
        Self::Canonical(id)
    }
}

impl TryFrom<&str> for EntityRef {
    type Error = ValidationError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_wins_over_numeric() {
        let entity_ref = EntityRef::parse("000078678605").unwrap();
        assert!(entity_ref.is_canonical());
        // Normalization preserves the leading zeros
        assert_eq!(entity_ref.lookup_key(), "000078678605");
    }

    #[test]
    fn test_numeric_string_classifies_as_legacy() {
        let entity_ref = EntityRef::parse("48213").unwrap();
        assert_eq!(entity_ref, EntityRef::Legacy(48213));
        assert!(!entity_ref.is_canonical());
        assert_eq!(entity_ref.lookup_key(), "48213");
    }

    #[test]
    fn test_legacy_normalization_is_plain_decimal() {
        // Never zero-padded into 12-digit form
        let entity_ref = EntityRef::from(42);
        assert_eq!(entity_ref.lookup_key(), "42");
    }

    #[test]
    fn test_garbage_is_rejected() {
        for raw in ["", "acme-llc", "12a4", "0x10"] {
            assert!(EntityRef::parse(raw).is_err(), "expected {raw:?} rejected");
        }
    }

    #[test]
    fn test_conversions() {
        let from_num: EntityRef = 7i64.into();
        assert_eq!(from_num, EntityRef::Legacy(7));

        let id = BusinessEntityId::from_digit(2);
        let from_id: EntityRef = id.clone().into();
        assert_eq!(from_id.lookup_key(), id.as_str());

        let from_str = EntityRef::try_from("000078678602").unwrap();
        assert_eq!(from_str, from_id);
    }
}
