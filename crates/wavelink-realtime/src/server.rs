//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use wavelink_core::Identity;
use wavelink_core::config::RealtimeConfig;

use crate::broadcast::publisher::{EventBroadcaster, PruneHook};
use crate::connection::handle::ConnectionHandle;
use crate::connection::registry::{ConnectionGuard, ConnectionRegistry};
use crate::handshake::coordinator::HandshakeCoordinator;
use crate::metrics::RealtimeMetrics;

/// Central real-time engine shared by the HTTP and WebSocket handlers.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Event broadcaster.
    pub broadcaster: Arc<EventBroadcaster>,
    /// Handshake coordinator.
    pub handshakes: Arc<HandshakeCoordinator>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: RealtimeConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates an engine whose broadcaster reports pruned connections to `hook`.
    pub fn with_prune_hook(config: RealtimeConfig, hook: Arc<dyn PruneHook>) -> Self {
        Self::build(config, Some(hook))
    }

    fn build(config: RealtimeConfig, hook: Option<Arc<dyn PruneHook>>) -> Self {
        let metrics = Arc::new(RealtimeMetrics::new());
        let registry = Arc::new(ConnectionRegistry::new(Arc::clone(&metrics)));
        let mut broadcaster = EventBroadcaster::new(Arc::clone(&registry), Arc::clone(&metrics));
        if let Some(hook) = hook {
            broadcaster = broadcaster.with_prune_hook(hook);
        }
        let broadcaster = Arc::new(broadcaster);
        let handshakes = Arc::new(HandshakeCoordinator::new(
            Arc::clone(&broadcaster),
            Arc::clone(&registry),
        ));

        info!(
            outbound_buffer = config.outbound_buffer_size,
            "Real-time engine initialized"
        );

        Self {
            registry,
            broadcaster,
            handshakes,
            metrics,
            config,
        }
    }

    /// Opens a connection for `identity`.
    ///
    /// Returns the registration guard and the receiver the socket writer
    /// drains. The connection stays registered until the guard is dropped.
    pub fn connect(&self, identity: Identity) -> (ConnectionGuard, mpsc::Receiver<Arc<str>>) {
        let (handle, rx) = ConnectionHandle::channel(identity, self.config.outbound_buffer_size);
        (self.registry.register_scoped(handle), rx)
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Closes every connection.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        self.registry.close_all();
    }
}
