//! HTTP server assembly and lifecycle

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use registry::{EntityAdapter, EntityDb};

use crate::config::ApiConfig;
use crate::error::Result;
use crate::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<ApiConfig>,

    /// The entity migration adapter
    pub adapter: EntityAdapter,
}

/// Main server structure
pub struct Server {
    config: Arc<ApiConfig>,
    app: Router,
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: ApiConfig) -> Result<Self> {
        info!("Initializing API server");

        let config = Arc::new(config);

        let db = EntityDb::new(&config.database)
            .await
            .map_err(crate::error::Error::Other)?;
        let adapter = EntityAdapter::new(db);

        let state = AppState {
            config: config.clone(),
            adapter,
        };

        let app = build_router(state, &config);

        Ok(Self { config, app })
    }

    /// Run until a shutdown signal arrives
    pub async fn run(self) -> Result<()> {
        let address = self.config.server.listen_address();
        info!("API server listening on {address}");

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .map_err(|e| crate::error::Error::Other(e.into()))?;

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::error::Error::Other(e.into()))?;

        Ok(())
    }
}

/// Assemble the router with shared state and middleware
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(routes::health))
        .route(
            "/v1/entities",
            post(routes::create_entity).get(routes::list_entities),
        )
        .route(
            "/v1/entities/:id",
            get(routes::read_entity).patch(routes::update_entity),
        )
        .route(
            "/v1/mailbox-subscriptions",
            post(routes::create_subscription),
        )
        .route(
            "/v1/mailbox-subscriptions/:id/entity",
            put(routes::link_mailbox),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout))
        .with_state(state);

    if config.server.cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app
}

/// Wait for ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
