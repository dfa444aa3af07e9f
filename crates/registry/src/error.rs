//! Error types for the entity registry

use common::entity_identity::AllocationError;
use common::error::IncorviaError;
use thiserror::Error;

/// Errors surfaced by registry operations
///
/// "Absent" is deliberately not an error: read and update return
/// `Option::None` both for rows that do not exist and for rows owned by
/// another user, so callers cannot distinguish the two.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Identifier allocation gave up
    #[error("entity id allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    /// Underlying persistence failure, propagated uninterpreted
    #[error("entity store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl IncorviaError for RegistryError {}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Whether a store error is a duplicate-key violation
///
/// The primary-key constraint is the authoritative collision signal for
/// identifier allocation; create retries on exactly this case.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_error_conversion() {
        let err: RegistryError = AllocationError::Exhausted { attempts: 100 }.into();
        assert!(matches!(err, RegistryError::Allocation(_)));
        assert!(err.to_string().contains("allocation failed"));
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
