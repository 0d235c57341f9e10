//! Event fan-out to connected WebSocket clients.

use std::sync::Arc;

use tracing::{debug, warn};

use wavelink_core::Identity;

use crate::connection::handle::{ConnectionHandle, ConnectionId, DeliveryError};
use crate::connection::registry::ConnectionRegistry;
use crate::handshake::event::HandshakeEvent;
use crate::metrics::RealtimeMetrics;

/// Observer notified whenever a publish prunes a dead connection.
pub trait PruneHook: Send + Sync {
    /// Called after `conn_id` has been removed from the registry.
    fn connection_pruned(&self, identity: &Identity, conn_id: ConnectionId, reason: DeliveryError);
}

/// Outcome of a single publish call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Connections a write was attempted on.
    pub recipients: usize,
    /// Connections the payload was queued onto.
    pub delivered: usize,
    /// Connections removed because the write failed.
    pub pruned: Vec<ConnectionId>,
}

/// Publishes handshake events over the connection registry.
pub struct EventBroadcaster {
    /// Registry of live connections.
    registry: Arc<ConnectionRegistry>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Optional prune observer.
    prune_hook: Option<Arc<dyn PruneHook>>,
}

impl std::fmt::Debug for EventBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBroadcaster")
            .field("prune_hook", &self.prune_hook.is_some())
            .finish()
    }
}

impl EventBroadcaster {
    /// Creates a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            registry,
            metrics,
            prune_hook: None,
        }
    }

    /// Installs an observer for pruned connections.
    pub fn with_prune_hook(mut self, hook: Arc<dyn PruneHook>) -> Self {
        self.prune_hook = Some(hook);
        self
    }

    /// Fans an event out.
    ///
    /// A targeted event reaches only the target's connections; a broadcast
    /// reaches every identity except the sender. The set of recipients is
    /// fixed under the registry's read lock at call time. Writes never wait:
    /// a connection whose write fails is unregistered before this returns,
    /// and its siblings are still attempted.
    pub fn publish(&self, event: &HandshakeEvent) -> PublishReport {
        let payload: Arc<str> = match serde_json::to_string(event) {
            Ok(json) => Arc::from(json),
            Err(e) => {
                warn!(kind = %event.kind, error = %e, "Failed to serialize handshake event");
                return PublishReport::default();
            }
        };

        self.metrics.event_published();

        let mut report = PublishReport::default();
        let mut dead: Vec<(Arc<ConnectionHandle>, DeliveryError)> = Vec::new();
        {
            let map = self.registry.read();
            let targets = map.iter().filter(|(identity, _)| match &event.to_identity {
                Some(to) => *identity == to,
                None => **identity != event.from_identity,
            });

            for (identity, connections) in targets {
                for conn in connections {
                    report.recipients += 1;
                    match conn.try_deliver(Arc::clone(&payload)) {
                        Ok(()) => report.delivered += 1,
                        Err(reason) => {
                            warn!(
                                identity = %identity,
                                conn_id = %conn.id,
                                error = %reason,
                                "Failed to deliver handshake event, pruning connection"
                            );
                            dead.push((Arc::clone(conn), reason));
                        }
                    }
                }
            }
        }

        for (conn, reason) in dead {
            if self.registry.unregister(&conn.identity, conn.id) {
                report.pruned.push(conn.id);
                if let Some(hook) = &self.prune_hook {
                    hook.connection_pruned(&conn.identity, conn.id, reason);
                }
            }
        }

        self.metrics.messages_delivered(report.delivered as u64);
        self.metrics.connections_pruned(report.pruned.len() as u64);

        debug!(
            kind = %event.kind,
            from = %event.from_identity,
            to = event.to_identity.as_ref().map(Identity::as_str).unwrap_or("*"),
            recipients = report.recipients,
            delivered = report.delivered,
            pruned = report.pruned.len(),
            "Handshake event published"
        );

        report
    }
}
