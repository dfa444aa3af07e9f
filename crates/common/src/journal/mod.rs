//! # Journal
//!
//! Telemetry initialization and structured audit logging for Incorvia
//! services. Everything is emitted through `tracing`; binaries install the
//! subscriber once at startup via [`init::init_telemetry`].

pub mod init;
pub mod logging;

pub use init::init_telemetry;
