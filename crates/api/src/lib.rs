//! # Incorvia HTTP API
//!
//! Thin axum surface over the entity registry. Route handlers consume the
//! migration adapter as in-process calls and translate its results to HTTP:
//! absent rows become 404, allocation exhaustion 503, store failures 500.
//! Caller identity arrives as the `x-user-id` header injected by the
//! upstream auth gateway.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use error::{Error, Result};

/// Crate version, reported at startup and by the health endpoint
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
