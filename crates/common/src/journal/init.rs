//! Telemetry initialization

use crate::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber from logging configuration
///
/// `RUST_LOG` takes precedence over the configured level; configured
/// per-target levels are appended to the filter.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut directives = config.level.clone();
    for (target, level) in &config.targets {
        directives.push_str(&format!(",{target}={level}"));
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init()?,
        "compact" => registry.with(fmt::layer().compact()).try_init()?,
        _ => registry.with(fmt::layer().with_target(false)).try_init()?,
    }

    info!(format = %config.format, "Telemetry initialized");
    Ok(())
}
