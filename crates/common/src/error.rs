//! Error handling for Incorvia
//!
//! This module defines the core error handling infrastructure used throughout
//! the Incorvia services. It provides:
//! - `IncorviaError` trait for consistent error handling
//! - Specific error types for configuration and input validation
//! - Integration with `thiserror` for ergonomic error handling
//!
//! # Design Principles
//! - All errors implement Send + Sync for async compatibility
//! - Use thiserror for library errors, anyhow for application errors
//! - Provide clear, actionable error messages

use thiserror::Error;

/// Base trait for all Incorvia-specific errors
///
/// This trait ensures all Incorvia errors are:
/// - Thread-safe (Send + Sync)
/// - Static lifetime (no borrowed data)
/// - Implement standard Error trait
pub trait IncorviaError: std::error::Error + Send + Sync + 'static {}

/// Configuration-related errors
///
/// These errors occur during configuration loading, parsing, or validation.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for {key}: {value} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },
}

impl IncorviaError for ConfigurationError {}

/// Input validation errors
///
/// These errors occur when externally supplied data fails format checks,
/// most prominently identifier strings arriving from legacy callers.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid input format
    #[error("Invalid {field} format: {value}")]
    InvalidFormat { field: String, value: String },

    /// Required field missing
    #[error("Required field missing: {field}")]
    MissingField { field: String },
}

impl IncorviaError for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigurationError::InvalidValue {
            key: "max_connections".to_string(),
            value: "0".to_string(),
            reason: "must be greater than 0".to_string(),
        };

        let display = format!("{err}");
        assert!(display.contains("max_connections"));
        assert!(display.contains("greater than 0"));
    }

    #[test]
    fn test_incorvia_error_trait() {
        fn assert_incorvia_error(_: impl IncorviaError) {}

        assert_incorvia_error(ConfigurationError::MissingRequired {
            key: "database.url".to_string(),
        });
        assert_incorvia_error(ValidationError::InvalidFormat {
            field: "entity_id".to_string(),
            value: "bogus".to_string(),
        });
    }
}
