//! Identifier allocation with collision probing
//!
//! Allocation derives a candidate trailing digit from the current timestamp
//! combined with a random digit, then probes the entity store for an
//! existing row before handing the candidate out. The probe is an
//! optimization, not the correctness boundary: the store's primary-key
//! constraint is the authoritative collision signal, and callers re-allocate
//! when an insert reports a duplicate key.

use async_trait::async_trait;
use metrics::counter;
use rand::Rng;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::warn;

use crate::entity_identity::constants::{
    ALLOCATION_RETRY_DELAY, ENTITY_ID_NAMESPACE, MAX_ALLOCATION_ATTEMPTS,
};
use crate::entity_identity::entity_id::BusinessEntityId;
use crate::error::IncorviaError;
use crate::journal::logging;

/// Occupancy probe against the entity store
///
/// Implemented by the registry's database layer; tests provide in-memory
/// implementations.
#[async_trait]
pub trait IdOccupancy: Send + Sync {
    /// Returns true if an entity row with this exact id already exists
    async fn is_taken(&self, id: &BusinessEntityId) -> anyhow::Result<bool>;
}

/// Errors surfaced by identifier allocation
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Every attempt found its candidate taken
    ///
    /// The namespace holds only [`ENTITY_ID_NAMESPACE`] identifiers, so this
    /// is reachable in practice once the account's filing numbers fill up.
    #[error("no free entity id after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl IncorviaError for AllocationError {}

/// Allocator for fresh business-entity identifiers
#[derive(Debug, Clone)]
pub struct IdAllocator {
    max_attempts: u32,
    retry_delay: Duration,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ALLOCATION_ATTEMPTS,
            retry_delay: ALLOCATION_RETRY_DELAY,
        }
    }
}

impl IdAllocator {
    /// Create an allocator with the standard retry bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator with custom retry bounds
    pub fn with_limits(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts,
            retry_delay,
        }
    }

    /// Allocate an identifier presumed free at probe time
    ///
    /// A failed probe is logged and the candidate treated as free:
    /// availability wins over strictness because the insert constraint
    /// backstops uniqueness. Returns [`AllocationError::Exhausted`] when
    /// every attempt found its candidate occupied; no identifier is ever
    /// returned without a uniqueness signal.
    pub async fn allocate(
        &self,
        occupancy: &dyn IdOccupancy,
    ) -> Result<BusinessEntityId, AllocationError> {
        for attempt in 1..=self.max_attempts {
            let candidate = Self::candidate();

            match occupancy.is_taken(&candidate).await {
                Ok(false) => return Ok(candidate),
                Ok(true) => {
                    logging::log_allocation_collision(candidate.as_str(), attempt);
                    counter!("entity_id_collisions_total").increment(1);
                }
                Err(e) => {
                    warn!(
                        candidate = %candidate,
                        error = %e,
                        "Existence probe failed, treating candidate as free"
                    );
                    counter!("entity_id_probe_failures_total").increment(1);
                    return Ok(candidate);
                }
            }

            // Perturb the timestamp component before the next derivation
            tokio::time::sleep(self.retry_delay).await;
        }

        counter!("entity_id_allocation_exhausted_total").increment(1);
        Err(AllocationError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Derive a candidate from the clock and a random digit
    ///
    /// Mixing the sub-second timestamp with a random digit spreads
    /// concurrent callers across the namespace better than either source
    /// alone.
    fn candidate() -> BusinessEntityId {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::from(d.subsec_nanos()) / 1_000)
            .unwrap_or(0);
        let salt = rand::thread_rng().gen_range(0..u64::from(ENTITY_ID_NAMESPACE));

        BusinessEntityId::from_digit(((micros + salt) % u64::from(ENTITY_ID_NAMESPACE)) as u8)
    }
}
