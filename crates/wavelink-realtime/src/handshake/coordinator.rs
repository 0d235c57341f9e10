//! Handshake coordinator — turns send requests into published events.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use wavelink_core::{AppResult, Identity};

use super::event::{HandshakeEvent, HandshakeKind, HandshakeRequest};
use crate::broadcast::publisher::EventBroadcaster;
use crate::connection::registry::ConnectionRegistry;

/// Thin domain layer over the broadcaster.
///
/// Sender identities are taken as asserted by the caller; no session or
/// token backs them.
#[derive(Debug)]
pub struct HandshakeCoordinator {
    broadcaster: Arc<EventBroadcaster>,
    registry: Arc<ConnectionRegistry>,
}

impl HandshakeCoordinator {
    /// Creates a coordinator.
    pub fn new(broadcaster: Arc<EventBroadcaster>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            broadcaster,
            registry,
        }
    }

    /// Validates a request, stamps it, and publishes it.
    ///
    /// Delivery is best-effort: once the event reaches the broadcaster this
    /// succeeds regardless of how many connections received it.
    pub fn send_handshake(
        &self,
        from_identity: &str,
        request: HandshakeRequest,
    ) -> AppResult<HandshakeEvent> {
        let from_identity = Identity::parse(from_identity)?;
        let kind: HandshakeKind = request.kind.parse()?;
        let to_identity = match request.to_identity {
            Some(to) if !to.trim().is_empty() => Some(Identity::parse(to)?),
            _ => None,
        };

        let event = HandshakeEvent {
            kind,
            from_identity,
            to_identity,
            message: request.message.filter(|m| !m.is_empty()),
            timestamp: Utc::now(),
        };

        let report = self.broadcaster.publish(&event);

        info!(
            kind = %event.kind,
            from = %event.from_identity,
            broadcast = event.is_broadcast(),
            delivered = report.delivered,
            "Handshake sent"
        );

        Ok(event)
    }

    /// Identities that currently hold at least one connection.
    pub fn active_identities(&self) -> Vec<Identity> {
        self.registry.snapshot()
    }
}
