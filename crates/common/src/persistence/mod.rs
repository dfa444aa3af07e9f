//! # Persistence Utilities
//!
//! Connection management shared by every Incorvia service that talks to the
//! database.

pub mod connection;

pub use connection::*;
