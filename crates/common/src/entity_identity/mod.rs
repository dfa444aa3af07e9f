//! Business-entity identity system
//!
//! This module provides the identifier machinery for business entities:
//! a fixed-prefix 12-digit identifier, an allocator that verifies candidates
//! against the entity store, and a boundary type reconciling legacy numeric
//! identifiers with the canonical string form during the data-model
//! migration.
//!
//! # Example
//! ```
//! use common::entity_identity::BusinessEntityId;
//!
//! let id: BusinessEntityId = "000078678604".parse().unwrap();
//! assert_eq!(id.trailing_digit(), 4);
//! ```

pub mod allocator;
pub mod constants;
pub mod entity_id;
pub mod validation;

pub use allocator::{AllocationError, IdAllocator, IdOccupancy};
pub use constants::*;
pub use entity_id::BusinessEntityId;
pub use validation::EntityRef;
