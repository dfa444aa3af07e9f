//! API service configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use common::config::{
    load_config, load_from_file, ConfigValidation, DatabaseConfig, LoggingConfig, MetricsConfig,
    ServerConfig,
};
use common::error::ConfigurationError;

/// Top-level configuration for the API service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Entity store database
    pub database: DatabaseConfig,

    /// HTTP server binding
    pub server: ServerConfig,

    /// Telemetry output
    pub logging: LoggingConfig,

    /// Prometheus exporter
    pub metrics: MetricsConfig,
}

impl ApiConfig {
    /// Load configuration, optionally from an explicit file path
    ///
    /// Defaults, then `config.toml` (when present), then `INCORVIA_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let config: Self = match path {
            Some(path) => load_from_file(path)?,
            None => load_config()?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidation for ApiConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.database.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ApiConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_section_fails_validation() {
        let config = ApiConfig {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
