//! # Entity Migration Adapter
//!
//! CRUD over business entities that is agnostic to whether the caller holds
//! a legacy numeric identifier or the canonical 12-digit string. Every
//! operation normalizes to the string key space before touching the store
//! and enforces ownership by suppression: a row owned by someone else is
//! indistinguishable from a row that does not exist.

use chrono::Utc;
use metrics::counter;
use tracing::warn;

use common::entity_identity::{BusinessEntityId, EntityRef, IdAllocator};
use common::journal::logging;

use crate::error::{is_unique_violation, RegistryError, Result};
use crate::models::{BusinessEntity, EntityChanges, EntityDraft, MailboxSubscription};
use crate::persistence::EntityDb;

/// Bound on allocate-insert rounds in [`EntityAdapter::create`]
///
/// Each round runs the allocator's full probe loop; a round only fails when
/// another writer claimed the candidate between probe and insert.
const MAX_CREATE_ATTEMPTS: u32 = 3;

/// The migration adapter over the entity store
#[derive(Debug, Clone)]
pub struct EntityAdapter {
    db: EntityDb,
    allocator: IdAllocator,
}

impl EntityAdapter {
    /// Create an adapter with the standard allocator
    pub fn new(db: EntityDb) -> Self {
        Self {
            db,
            allocator: IdAllocator::new(),
        }
    }

    /// Create an adapter with a custom allocator
    pub fn with_allocator(db: EntityDb, allocator: IdAllocator) -> Self {
        Self { db, allocator }
    }

    /// Access to the underlying store, for health checks
    pub fn db(&self) -> &EntityDb {
        &self.db
    }

    /// Allocate a fresh identifier without persisting anything
    ///
    /// Persistence is the caller's responsibility; the id remains
    /// unreserved until a row is inserted under it.
    pub async fn allocate_id(&self) -> Result<BusinessEntityId> {
        Ok(self.allocator.allocate(&self.db).await?)
    }

    /// Create an entity owned by `user_id`
    ///
    /// Allocates an identifier, merges it with the draft, and inserts. A
    /// duplicate-key failure means a concurrent writer won the
    /// check-then-insert race for the candidate; allocation is retried from
    /// scratch a bounded number of times. Any other store failure
    /// propagates unchanged.
    pub async fn create(&self, draft: EntityDraft, user_id: &str) -> Result<BusinessEntity> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let id = self.allocator.allocate(&self.db).await?;
            let now = Utc::now();

            let entity = BusinessEntity {
                id: id.as_str().to_string(),
                user_id: user_id.to_string(),
                name: draft.name.clone(),
                entity_type: draft.entity_type.clone(),
                state: draft.state.clone(),
                status: draft.status.clone(),
                created_at: now,
                updated_at: now,
            };

            match self.db.insert_entity(&entity).await {
                Ok(()) => {
                    logging::log_entity_created(
                        &entity.id,
                        user_id,
                        &entity.entity_type,
                        &entity.state,
                    );
                    counter!("entities_created_total").increment(1);
                    return Ok(entity);
                }
                Err(e) if is_unique_violation(&e) => {
                    warn!(
                        entity_id = %id,
                        "Insert lost the allocation race, re-allocating"
                    );
                    counter!("entity_id_insert_conflicts_total").increment(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RegistryError::Allocation(
            common::entity_identity::AllocationError::Exhausted {
                attempts: MAX_CREATE_ATTEMPTS,
            },
        ))
    }

    /// Read an entity as `user_id`
    ///
    /// Absent and not-owned are the same `None`: existence is never leaked
    /// to non-owners.
    pub async fn read(
        &self,
        entity_ref: &EntityRef,
        user_id: &str,
    ) -> Result<Option<BusinessEntity>> {
        let key = entity_ref.lookup_key();

        let Some(entity) = self.db.fetch_entity(&key).await? else {
            return Ok(None);
        };

        if entity.user_id != user_id {
            logging::log_ownership_suppressed(&key, user_id, "read");
            counter!("entity_access_suppressed_total").increment(1);
            return Ok(None);
        }

        Ok(Some(entity))
    }

    /// Read by a raw string identifier
    ///
    /// Strings that are neither canonical nor numeric cannot name any
    /// stored row and resolve to absent without a store round trip.
    pub async fn read_raw(&self, raw: &str, user_id: &str) -> Result<Option<BusinessEntity>> {
        match EntityRef::parse(raw) {
            Ok(entity_ref) => self.read(&entity_ref, user_id).await,
            Err(_) => Ok(None),
        }
    }

    /// Update an entity as `user_id`
    ///
    /// The ownership check runs first; when it suppresses, the store is
    /// left untouched. Otherwise the partial changes are applied with a
    /// refreshed `updated_at` and the updated row is returned.
    pub async fn update(
        &self,
        entity_ref: &EntityRef,
        user_id: &str,
        changes: EntityChanges,
    ) -> Result<Option<BusinessEntity>> {
        let Some(existing) = self.read(entity_ref, user_id).await? else {
            return Ok(None);
        };

        self.db
            .apply_changes(&existing.id, &changes, Utc::now())
            .await?;

        counter!("entities_updated_total").increment(1);
        self.db.fetch_entity(&existing.id).await.map_err(Into::into)
    }

    /// Link a mailbox subscription to an entity
    ///
    /// No ownership check and no existence check on the entity; that is
    /// the caller's responsibility, and a dangling link surfaces as a plain
    /// store error from referential integrity.
    pub async fn link_mailbox(
        &self,
        entity_id: &BusinessEntityId,
        subscription_id: &str,
    ) -> Result<()> {
        self.db
            .link_subscription(subscription_id, entity_id.as_str())
            .await?;

        logging::log_mailbox_linked(subscription_id, entity_id.as_str());
        Ok(())
    }

    /// Create a mailbox subscription with no entity link
    pub async fn create_subscription(
        &self,
        subscription_id: &str,
        user_id: &str,
    ) -> Result<MailboxSubscription> {
        let subscription = MailboxSubscription {
            id: subscription_id.to_string(),
            user_id: user_id.to_string(),
            business_entity_id: None,
            created_at: Utc::now(),
        };

        self.db.insert_subscription(&subscription).await?;
        Ok(subscription)
    }

    /// All entities owned by `user_id`
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<BusinessEntity>> {
        self.db.list_for_user(user_id).await.map_err(Into::into)
    }
}
