//! Main entry point for the Incorvia API service

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use api::{config::ApiConfig, server::Server};
use common::journal::init_telemetry;

#[derive(Parser)]
#[command(name = "incorvia-api", about = "Incorvia entity registry API", version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ApiConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    init_telemetry(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {e}"))?;

    info!("Starting Incorvia API v{}", api::VERSION);

    if config.metrics.enabled {
        let exporter_address: std::net::SocketAddr =
            format!("{}:{}", config.metrics.host, config.metrics.port)
                .parse()
                .context("Invalid metrics exporter address")?;

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(exporter_address)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Prometheus exporter listening on {exporter_address}");
    }

    let server = Server::new(config).await?;

    match server.run().await {
        Ok(()) => {
            info!("API server shut down gracefully");
            Ok(())
        }
        Err(e) => {
            error!("API server error: {e}");
            Err(e.into())
        }
    }
}
