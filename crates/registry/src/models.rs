//! Row models for the entity registry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered business entity
///
/// `id` is the canonical string identifier for rows created through the
/// adapter; rows carried over from the pre-migration schema may still hold
/// their stringified numeric id until backfilled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BusinessEntity {
    /// String primary key
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Legal name, e.g. "Acme LLC"
    pub name: String,
    /// Entity type, e.g. "LLC", "C-Corp"
    pub entity_type: String,
    /// Formation state, e.g. "CA"
    pub state: String,
    /// Opaque lifecycle status assigned by the service layer
    pub status: String,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
    /// Re-stamped on every mutation
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for entity creation
///
/// The identifier, owner, and timestamps are merged in by the adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDraft {
    pub name: String,
    pub entity_type: String,
    pub state: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "draft".to_string()
}

/// Partial update to an entity
///
/// Absent fields are left untouched; `updated_at` is always re-stamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityChanges {
    pub name: Option<String>,
    pub entity_type: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
}

/// A mailbox subscription, optionally linked to a business entity
///
/// The back-reference is established post-hoc by the linking operation,
/// never at subscription-creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MailboxSubscription {
    pub id: String,
    pub user_id: String,
    pub business_entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
