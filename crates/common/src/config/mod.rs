//! # Configuration Management
//!
//! Layered configuration loading and shared configuration types for all
//! Incorvia services.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_with_options, load_from_file, LoadOptions};
pub use types::*;
