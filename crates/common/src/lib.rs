//! # Common Incorvia
//!
//! Core shared types, error definitions, and identifier machinery for the
//! Incorvia platform. This crate provides the building blocks that the
//! registry and api crates depend on.
//!
//! ## Key Features
//! - Business-entity identity system (fixed-prefix identifier allocation,
//!   validation, and legacy/canonical normalization)
//! - Error handling with the `IncorviaError` trait
//! - Layered configuration loading (defaults, TOML file, environment)
//! - Telemetry initialization and structured audit logging
//! - Database connection utilities
//!
//! ## Design Principles
//! - Minimal dependencies to avoid bloat in dependent crates
//! - Strong typing with validation logic
//! - Serde support for serialization across service boundaries
//! - Trait-based seams for dependency injection

pub mod config;
pub mod entity_identity;
pub mod error;
pub mod journal;
pub mod persistence;

// Re-export commonly used types at the crate root for convenience
pub use config::*;
pub use entity_identity::{AllocationError, BusinessEntityId, EntityRef, IdAllocator, IdOccupancy};
pub use error::*;
