//! Delivery ledger — at-most-once admission of webhook deliveries.
//!
//! Remembers delivery identifiers in a bounded, expiring moka cache. The
//! check and the insert happen in one atomic entry operation, so two
//! concurrent deliveries carrying the same identifier cannot both be
//! admitted. Identifiers older than the TTL, or the least recently seen
//! ones once capacity is reached, are forgotten and would be admitted
//! again.

use std::time::Duration;

use moka::future::Cache;
use moka::policy::EvictionPolicy;
use tracing::debug;

/// Result of offering a delivery identifier to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting; the caller may run side effects.
    Admit,
    /// Already seen; the caller must acknowledge without side effects.
    Duplicate,
}

/// Bounded record of processed delivery identifiers.
#[derive(Debug, Clone)]
pub struct DeliveryLedger {
    seen: Cache<String, ()>,
}

impl DeliveryLedger {
    /// Create a ledger remembering up to `capacity` identifiers for `ttl`.
    ///
    /// Eviction is LRU so the newest identifiers survive capacity pressure.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let seen = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { seen }
    }

    /// Record `delivery_id`, admitting it only the first time it is seen.
    ///
    /// An empty identifier cannot be deduplicated and is always admitted
    /// without being recorded.
    pub async fn admit(&self, delivery_id: &str) -> Admission {
        if delivery_id.is_empty() {
            return Admission::Admit;
        }

        let entry = self.seen.entry(delivery_id.to_string()).or_insert(()).await;
        if entry.is_fresh() {
            debug!(webhook_id = %delivery_id, "Delivery recorded");
            Admission::Admit
        } else {
            Admission::Duplicate
        }
    }

    /// Whether `delivery_id` is currently remembered.
    pub fn contains(&self, delivery_id: &str) -> bool {
        self.seen.contains_key(delivery_id)
    }

    /// Apply pending evictions and expirations.
    pub async fn run_pending_tasks(&self) {
        self.seen.run_pending_tasks().await;
    }
}
