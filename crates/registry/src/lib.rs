//! # Incorvia Entity Registry
//!
//! The entity store and the identifier migration adapter. The store is a
//! SQLite-backed table of business entities keyed by their canonical string
//! identifier; the adapter layers identifier allocation, legacy/canonical
//! normalization, and ownership enforcement on top of it.
//!
//! Route handlers consume [`adapter::EntityAdapter`] as plain in-process
//! calls; nothing in this crate defines a wire format.

pub mod adapter;
pub mod error;
pub mod models;
pub mod persistence;

pub use adapter::EntityAdapter;
pub use error::RegistryError;
pub use models::{BusinessEntity, EntityChanges, EntityDraft, MailboxSubscription};
pub use persistence::EntityDb;
