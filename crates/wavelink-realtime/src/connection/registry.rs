//! Connection registry — tracks live connections indexed by identity.
//!
//! The identity map is guarded by a single reader/writer lock so that
//! [`ConnectionRegistry::snapshot`] and fan-out iteration observe a
//! point-in-time view, while `register`/`unregister` are exclusive.
//! An identity whose last connection is removed is deleted from the map
//! in the same critical section, so no identity is ever visible with zero
//! connections.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::{debug, info};

use wavelink_core::Identity;

use super::handle::{ConnectionHandle, ConnectionId};
use crate::metrics::RealtimeMetrics;

type ConnectionMap = HashMap<Identity, Vec<Arc<ConnectionHandle>>>;

/// Thread-safe map of identity → live connections.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Identity → connections (one identity may hold several, e.g. browser tabs).
    connections: RwLock<ConnectionMap>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
}

impl ConnectionRegistry {
    /// Creates a new empty registry.
    pub fn new(metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Adds a connection under its identity, creating the set if absent.
    pub fn register(&self, handle: Arc<ConnectionHandle>) {
        let identity = handle.identity.clone();
        let conn_id = handle.id;
        let total = {
            let mut map = self.write();
            let set = map.entry(identity.clone()).or_default();
            set.push(handle);
            set.len()
        };
        self.metrics.connection_opened();

        info!(
            identity = %identity,
            conn_id = %conn_id,
            connections = total,
            "Connection registered"
        );
    }

    /// Registers a connection and returns a guard that unregisters it on drop.
    pub fn register_scoped(self: &Arc<Self>, handle: Arc<ConnectionHandle>) -> ConnectionGuard {
        self.register(Arc::clone(&handle));
        ConnectionGuard {
            registry: Arc::clone(self),
            handle,
        }
    }

    /// Removes one connection. Removing an absent connection is a no-op.
    ///
    /// Returns `true` if the connection was registered.
    pub fn unregister(&self, identity: &Identity, conn_id: ConnectionId) -> bool {
        let removed = {
            let mut map = self.write();
            let Some(set) = map.get_mut(identity) else {
                return false;
            };
            let before = set.len();
            set.retain(|c| c.id != conn_id);
            let removed = set.len() < before;
            if set.is_empty() {
                map.remove(identity);
            }
            removed
        };

        if removed {
            self.metrics.connection_closed();
            info!(identity = %identity, conn_id = %conn_id, "Connection unregistered");
        } else {
            debug!(identity = %identity, conn_id = %conn_id, "Unregister of unknown connection ignored");
        }
        removed
    }

    /// Identities with at least one live connection, sorted.
    pub fn snapshot(&self) -> Vec<Identity> {
        let mut identities: Vec<Identity> = self.read().keys().cloned().collect();
        identities.sort();
        identities
    }

    /// All connections currently registered for an identity.
    pub fn connections_for(&self, identity: &Identity) -> Vec<Arc<ConnectionHandle>> {
        self.read().get(identity).cloned().unwrap_or_default()
    }

    /// Checks if an identity currently has a live connection.
    pub fn is_connected(&self, identity: &Identity) -> bool {
        self.read().contains_key(identity)
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    /// Returns the number of identities with a live connection.
    pub fn identity_count(&self) -> usize {
        self.read().len()
    }

    /// Marks every connection closed, waking its writer, and empties the
    /// registry.
    pub fn close_all(&self) -> usize {
        let drained: Vec<Arc<ConnectionHandle>> =
            self.write().drain().flat_map(|(_, set)| set).collect();
        for conn in &drained {
            conn.mark_closed();
            self.metrics.connection_closed();
        }
        info!(count = drained.len(), "All connections closed");
        drained.len()
    }

    /// Shared read access for fan-out.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ConnectionMap> {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ConnectionMap> {
        self.connections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a connection registered for as long as it is alive.
///
/// Dropping the guard (normal return, early `?` exit, or unwinding from a
/// panic) marks the connection closed and unregisters it.
#[derive(Debug)]
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    handle: Arc<ConnectionHandle>,
}

impl ConnectionGuard {
    /// The guarded connection.
    pub fn handle(&self) -> &Arc<ConnectionHandle> {
        &self.handle
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.handle.mark_closed();
        self.registry
            .unregister(&self.handle.identity, self.handle.id);
    }
}
