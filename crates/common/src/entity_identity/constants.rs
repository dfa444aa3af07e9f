//! Constants and validation for the entity identity system

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

/// Fixed prefix shared by every business-entity identifier
///
/// The full identifier is this 11-digit prefix plus exactly one trailing
/// digit, giving a namespace of ten identifiers. Narrow on purpose: the
/// platform registers entities under a single filing agent account, and the
/// trailing digit is the only variable part of the account's filing number.
pub const ENTITY_ID_PREFIX: &str = "00007867860";

/// Total length of a business-entity identifier
pub const ENTITY_ID_LENGTH: usize = 12;

/// Number of distinct identifiers the prefix admits
pub const ENTITY_ID_NAMESPACE: u32 = 10;

/// Maximum number of attempts when allocating a fresh identifier
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 100;

/// Pause between allocation attempts
///
/// Long enough to perturb the timestamp component feeding the candidate
/// digit when attempts collide back-to-back.
pub const ALLOCATION_RETRY_DELAY: Duration = Duration::from_millis(3);

/// Regular expression validating the identifier format
///
/// Valid form: the fixed prefix followed by a single decimal digit,
/// e.g. `000078678604`.
pub static ENTITY_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^00007867860[0-9]$").expect("Invalid entity id regex pattern"));

/// Validates a potential business-entity identifier
///
/// Returns `true` iff the string is exactly 12 decimal digits starting with
/// the fixed prefix.
pub fn is_valid_entity_id(id: &str) -> bool {
    ENTITY_ID_PATTERN.is_match(id)
}

/// Display formatting for an identifier
///
/// Identity function: valid identifiers are already display-ready, and no
/// normalization is attempted for invalid input, so callers must not assume
/// display-safety of what comes back.
pub fn format_entity_id(id: &str) -> &str {
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_validation() {
        // Valid: prefix plus each trailing digit
        for d in 0..10 {
            assert!(is_valid_entity_id(&format!("{ENTITY_ID_PREFIX}{d}")));
        }

        // Invalid
        assert!(!is_valid_entity_id("")); // Empty
        assert!(!is_valid_entity_id("00007867860")); // Prefix only, 11 chars
        assert!(!is_valid_entity_id("0000786786055")); // 13 chars
        assert!(!is_valid_entity_id("000078678614")); // Wrong prefix digit
        assert!(!is_valid_entity_id("0000786786a4")); // Non-digit
        assert!(!is_valid_entity_id("100078678604")); // Prefix mismatch at start
    }

    #[test]
    fn test_pattern_agrees_with_structural_invariant() {
        // The regex must encode exactly: length 12, all digits, fixed prefix
        for candidate in [
            "000078678600",
            "000078678609",
            "000078678610",
            "00007867860x",
            "9000786786094",
            "00007867860",
        ] {
            let structural = candidate.len() == ENTITY_ID_LENGTH
                && candidate.bytes().all(|b| b.is_ascii_digit())
                && candidate.starts_with(ENTITY_ID_PREFIX);
            assert_eq!(
                is_valid_entity_id(candidate),
                structural,
                "pattern and structural invariant disagree on {candidate}"
            );
        }
    }

    #[test]
    fn test_format_is_identity_and_idempotent() {
        let valid = "000078678607";
        let invalid = "not-an-id";

        assert_eq!(format_entity_id(valid), valid);
        assert_eq!(format_entity_id(invalid), invalid);
        assert_eq!(
            format_entity_id(format_entity_id(invalid)),
            format_entity_id(invalid)
        );
    }

    #[test]
    fn test_constants_values() {
        assert_eq!(ENTITY_ID_PREFIX.len(), 11);
        assert_eq!(ENTITY_ID_LENGTH, 12);
        assert_eq!(ENTITY_ID_NAMESPACE, 10);
        assert_eq!(MAX_ALLOCATION_ATTEMPTS, 100);
    }
}
