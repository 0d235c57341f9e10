//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    /// Total connections ever registered
    connections_opened: AtomicU64,
    /// Total connections removed (disconnect, prune, or shutdown)
    connections_closed: AtomicU64,
    /// Total publish calls
    events_published: AtomicU64,
    /// Total payloads queued onto connections
    messages_delivered: AtomicU64,
    /// Total connections pruned after a failed write
    connections_pruned: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly registered connection.
    pub fn connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a removed connection.
    pub fn connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one publish call.
    pub fn event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` successful deliveries.
    pub fn messages_delivered(&self, count: u64) {
        self.messages_delivered.fetch_add(count, Ordering::Relaxed);
    }

    /// Record `count` pruned connections.
    pub fn connections_pruned(&self, count: u64) {
        self.connections_pruned.fetch_add(count, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_opened: self.connections_opened.load(Ordering::Relaxed),
            connections_closed: self.connections_closed.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            messages_delivered: self.messages_delivered.load(Ordering::Relaxed),
            connections_pruned: self.connections_pruned.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever registered
    pub connections_opened: u64,
    /// Total connections removed
    pub connections_closed: u64,
    /// Total publish calls
    pub events_published: u64,
    /// Total payloads queued onto connections
    pub messages_delivered: u64,
    /// Total connections pruned after a failed write
    pub connections_pruned: u64,
}
