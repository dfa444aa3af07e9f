//! # Configuration Loader
//!
//! Figment-based configuration loading with layered support:
//! 1. Compiled defaults
//! 2. Configuration file (TOML)
//! 3. Environment variable overrides
//!
//! Supports automatic environment variable mapping with prefixes.

use crate::error::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default configuration file name
const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable prefix for Incorvia
const DEFAULT_ENV_PREFIX: &str = "INCORVIA";

/// Load configuration with layered approach
///
/// # Configuration Layer Priority (highest to lowest)
/// 1. Environment variables (INCORVIA_*)
/// 2. Configuration file (config.toml or specified path)
/// 3. Compiled defaults
///
/// # Environment Variable Mapping
/// - Nested fields use double underscore: `INCORVIA_DATABASE__URL`
/// - Case insensitive matching
pub fn load_config<T>() -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    load_config_with_options::<T>(LoadOptions::default())
}

/// Load configuration from a specific file
///
/// The file must exist; environment overrides still apply on top.
pub fn load_from_file<T>(path: &Path) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    let options = LoadOptions {
        config_path: Some(path.to_path_buf()),
        env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        require_file: true,
    };
    load_config_with_options::<T>(options)
}

/// Configuration loading options
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Optional path to configuration file
    pub config_path: Option<PathBuf>,
    /// Environment variable prefix
    pub env_prefix: String,
    /// Whether configuration file is required
    pub require_file: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            require_file: false,
        }
    }
}

/// Load configuration with custom options
pub fn load_config_with_options<T>(options: LoadOptions) -> Result<T, ConfigurationError>
where
    T: Default + DeserializeOwned + serde::Serialize,
{
    // Start with compiled defaults
    let mut figment = Figment::new().merge(Serialized::defaults(T::default()));

    let config_path = options
        .config_path
        .or_else(|| Some(PathBuf::from(DEFAULT_CONFIG_FILE)));

    if let Some(path) = &config_path {
        if path.exists() {
            info!("Loading configuration from file: {}", path.display());
            figment = figment.merge(Toml::file(path));
        } else if options.require_file {
            return Err(ConfigurationError::FileNotFound {
                path: path.display().to_string(),
            });
        } else {
            warn!(
                "Configuration file not found: {} (using defaults)",
                path.display()
            );
        }
    }

    // Environment overrides, double underscore for nested fields
    debug!(
        "Loading environment variables with prefix: {}",
        options.env_prefix
    );
    figment = figment.merge(Env::prefixed(&format!("{}_", options.env_prefix)).split("__"));

    figment
        .extract()
        .map_err(|err| ConfigurationError::ParseError {
            details: format!("Failed to parse configuration: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::io::Write;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        name: String,
        retries: u32,
    }

    #[test]
    fn test_defaults_when_no_file() {
        let options = LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/config.toml")),
            ..Default::default()
        };
        let config: TestConfig = load_config_with_options(options).unwrap();
        assert_eq!(config, TestConfig::default());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result: Result<TestConfig, _> =
            load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(
            result,
            Err(ConfigurationError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "name = \"from-file\"\nretries = 7").unwrap();

        let config: TestConfig = load_from_file(file.path()).unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.retries, 7);
    }
}
