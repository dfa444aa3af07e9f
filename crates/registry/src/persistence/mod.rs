//! # Registry Persistence
//!
//! SQLite-backed storage for business entities and mailbox subscriptions.

pub mod entity_db;

pub use entity_db::EntityDb;
