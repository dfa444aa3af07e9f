//! # Entity Database
//!
//! Low-level persistence for the registry:
//! - Business entities keyed by their string identifier
//! - Mailbox subscriptions with an optional entity back-reference
//! - The occupancy probe consumed by the identifier allocator
//!
//! Ownership enforcement and identifier normalization live one layer up in
//! the adapter; everything here works on exact string keys.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use common::config::DatabaseConfig;
use common::entity_identity::{BusinessEntityId, IdOccupancy};
use common::persistence::establish_sqlite_pool;

use crate::models::{BusinessEntity, EntityChanges, MailboxSubscription};

/// Entity database client
#[derive(Debug, Clone)]
pub struct EntityDb {
    pool: SqlitePool,
}

impl EntityDb {
    /// Create a new entity database client
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("Creating entity database client");

        let pool = establish_sqlite_pool(config)
            .await
            .context("Failed to connect to SQLite database")?;

        let db = Self { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Create a client from an existing pool
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations
    ///
    /// No length CHECK on the id column: rows carried over from the
    /// pre-migration schema keep their short stringified numeric ids until
    /// backfilled. The primary key is what guarantees no two entities ever
    /// share an id.
    async fn run_migrations(&self) -> Result<()> {
        info!("Running entity database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS business_entities (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                state TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'draft',
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create business_entities table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_business_entities_user ON business_entities(user_id)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create user index")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mailbox_subscriptions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                business_entity_id TEXT REFERENCES business_entities(id),
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create mailbox_subscriptions table")?;

        info!("Entity database migrations completed");
        Ok(())
    }

    /// Insert a new entity row
    ///
    /// A duplicate id surfaces as a database unique violation; the adapter
    /// treats that as the authoritative allocation collision signal.
    pub async fn insert_entity(&self, entity: &BusinessEntity) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO business_entities
                (id, user_id, name, entity_type, state, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entity.id)
        .bind(&entity.user_id)
        .bind(&entity.name)
        .bind(&entity.entity_type)
        .bind(&entity.state)
        .bind(&entity.status)
        .bind(entity.created_at)
        .bind(entity.updated_at)
        .execute(&self.pool)
        .await?;

        debug!("Inserted business entity {}", entity.id);
        Ok(())
    }

    /// Point lookup by exact string id
    pub async fn fetch_entity(&self, id: &str) -> Result<Option<BusinessEntity>, sqlx::Error> {
        sqlx::query_as::<_, BusinessEntity>(
            "SELECT id, user_id, name, entity_type, state, status, created_at, updated_at
             FROM business_entities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Prefix scan over the id column
    ///
    /// Migration-era lookup path: finds canonical rows under the fixed
    /// prefix regardless of trailing digit.
    pub async fn fetch_by_prefix(&self, prefix: &str) -> Result<Vec<BusinessEntity>, sqlx::Error> {
        sqlx::query_as::<_, BusinessEntity>(
            "SELECT id, user_id, name, entity_type, state, status, created_at, updated_at
             FROM business_entities WHERE id LIKE ? || '%' ORDER BY id",
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
    }

    /// All entities owned by a user, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<BusinessEntity>, sqlx::Error> {
        sqlx::query_as::<_, BusinessEntity>(
            "SELECT id, user_id, name, entity_type, state, status, created_at, updated_at
             FROM business_entities WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Apply a partial update and re-stamp `updated_at`
    ///
    /// Absent fields keep their stored values.
    pub async fn apply_changes(
        &self,
        id: &str,
        changes: &EntityChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE business_entities SET
                name = COALESCE(?, name),
                entity_type = COALESCE(?, entity_type),
                state = COALESCE(?, state),
                status = COALESCE(?, status),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.entity_type)
        .bind(&changes.state)
        .bind(&changes.status)
        .bind(updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!("Applied changes to business entity {id}");
        Ok(())
    }

    /// Insert a mailbox subscription with no entity link
    pub async fn insert_subscription(
        &self,
        subscription: &MailboxSubscription,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO mailbox_subscriptions (id, user_id, business_entity_id, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&subscription.id)
        .bind(&subscription.user_id)
        .bind(&subscription.business_entity_id)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Point the subscription's back-reference at an entity
    ///
    /// Unconditional update by primary key. Referential integrity failures
    /// (the entity does not exist) propagate as plain database errors.
    pub async fn link_subscription(
        &self,
        subscription_id: &str,
        entity_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE mailbox_subscriptions SET business_entity_id = ? WHERE id = ?")
            .bind(entity_id)
            .bind(subscription_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Fetch a subscription by id
    pub async fn fetch_subscription(
        &self,
        id: &str,
    ) -> Result<Option<MailboxSubscription>, sqlx::Error> {
        sqlx::query_as::<_, MailboxSubscription>(
            "SELECT id, user_id, business_entity_id, created_at
             FROM mailbox_subscriptions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Connection health for readiness probes
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        common::persistence::test_connection_health(&self.pool).await
    }
}

#[async_trait]
impl IdOccupancy for EntityDb {
    async fn is_taken(&self, id: &BusinessEntityId) -> anyhow::Result<bool> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM business_entities WHERE id = ?)")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::entity_identity::ENTITY_ID_PREFIX;

    fn sample_entity(id: &str, user_id: &str) -> BusinessEntity {
        let now = Utc::now();
        BusinessEntity {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: "Acme LLC".to_string(),
            entity_type: "LLC".to_string(),
            state: "CA".to_string(),
            status: "draft".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn memory_db() -> EntityDb {
        EntityDb::new(&DatabaseConfig::default())
            .await
            .expect("Should create in-memory database")
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = memory_db().await;
        let entity = sample_entity("000078678600", "u1");

        db.insert_entity(&entity).await.expect("Should insert");

        let fetched = db
            .fetch_entity("000078678600")
            .await
            .expect("Should query")
            .expect("Should find row");
        assert_eq!(fetched.name, "Acme LLC");
        assert_eq!(fetched.user_id, "u1");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let db = memory_db().await;
        let entity = sample_entity("000078678601", "u1");

        db.insert_entity(&entity).await.expect("First insert");

        let err = db
            .insert_entity(&sample_entity("000078678601", "u2"))
            .await
            .expect_err("Second insert must fail");
        assert!(crate::error::is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_occupancy_probe() {
        let db = memory_db().await;
        let id: BusinessEntityId = "000078678602".parse().unwrap();

        assert!(!db.is_taken(&id).await.unwrap());

        db.insert_entity(&sample_entity(id.as_str(), "u1"))
            .await
            .unwrap();
        assert!(db.is_taken(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_prefix_scan_finds_canonical_rows() {
        let db = memory_db().await;

        db.insert_entity(&sample_entity("000078678603", "u1"))
            .await
            .unwrap();
        db.insert_entity(&sample_entity("000078678607", "u1"))
            .await
            .unwrap();
        // Legacy row outside the canonical prefix
        db.insert_entity(&sample_entity("48213", "u1")).await.unwrap();

        let rows = db.fetch_by_prefix(ENTITY_ID_PREFIX).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.id.starts_with(ENTITY_ID_PREFIX)));
    }

    #[tokio::test]
    async fn test_apply_changes_is_partial() {
        let db = memory_db().await;
        db.insert_entity(&sample_entity("000078678604", "u1"))
            .await
            .unwrap();

        let changes = EntityChanges {
            status: Some("active".to_string()),
            ..Default::default()
        };
        db.apply_changes("000078678604", &changes, Utc::now())
            .await
            .unwrap();

        let row = db.fetch_entity("000078678604").await.unwrap().unwrap();
        assert_eq!(row.status, "active");
        assert_eq!(row.name, "Acme LLC"); // Untouched
    }

    #[tokio::test]
    async fn test_subscription_insert_and_link() {
        let db = memory_db().await;
        db.insert_entity(&sample_entity("000078678605", "u1"))
            .await
            .unwrap();

        let subscription = MailboxSubscription {
            id: "sub-100".to_string(),
            user_id: "u1".to_string(),
            business_entity_id: None,
            created_at: Utc::now(),
        };
        db.insert_subscription(&subscription).await.unwrap();

        db.link_subscription("sub-100", "000078678605")
            .await
            .unwrap();

        let linked = db.fetch_subscription("sub-100").await.unwrap().unwrap();
        assert_eq!(
            linked.business_entity_id.as_deref(),
            Some("000078678605")
        );
    }

    #[tokio::test]
    async fn test_link_to_missing_entity_propagates() {
        let db = memory_db().await;

        let subscription = MailboxSubscription {
            id: "sub-200".to_string(),
            user_id: "u1".to_string(),
            business_entity_id: None,
            created_at: Utc::now(),
        };
        db.insert_subscription(&subscription).await.unwrap();

        // Foreign keys are enforced, so the dangling link is a plain store error
        let result = db.link_subscription("sub-200", "000078678699").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_for_user_scopes_by_owner() {
        let db = memory_db().await;
        db.insert_entity(&sample_entity("000078678606", "u1"))
            .await
            .unwrap();
        db.insert_entity(&sample_entity("000078678608", "u2"))
            .await
            .unwrap();

        let rows = db.list_for_user("u1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "000078678606");
    }
}
