//! Structured audit logging functions

use tracing::{info, warn};

/// Log creation of a business entity
pub fn log_entity_created(entity_id: &str, user_id: &str, entity_type: &str, state: &str) {
    info!(
        entity_id = %entity_id,
        user_id = %user_id,
        entity_type = %entity_type,
        state = %state,
        "Business entity created"
    );
}

/// Log a read or update suppressed by the ownership check
///
/// The caller receives an absent result; the journal keeps the distinction
/// so operators can audit cross-tenant probing.
pub fn log_ownership_suppressed(entity_id: &str, caller_user_id: &str, operation: &str) {
    warn!(
        entity_id = %entity_id,
        caller_user_id = %caller_user_id,
        operation = %operation,
        "Access to entity owned by another user suppressed"
    );
}

/// Log an identifier collision observed during allocation
pub fn log_allocation_collision(candidate: &str, attempt: u32) {
    warn!(
        candidate = %candidate,
        attempt = attempt,
        "Entity id candidate already taken, retrying"
    );
}

/// Log a mailbox subscription being linked to an entity
pub fn log_mailbox_linked(subscription_id: &str, entity_id: &str) {
    info!(
        subscription_id = %subscription_id,
        entity_id = %entity_id,
        "Mailbox subscription linked to business entity"
    );
}
