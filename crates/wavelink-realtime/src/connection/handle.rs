//! Individual WebSocket connection handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

use wavelink_core::Identity;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Why a write to a connection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The socket writer is gone or the connection was closed.
    #[error("connection closed")]
    Closed,
    /// The outbound queue is full; the peer is not draining it.
    #[error("outbound queue full")]
    QueueFull,
}

/// A handle to a single duplex connection.
///
/// Holds the sender half of the connection's outbound queue. The receiver
/// half is drained by the socket writer task owned by the transport layer.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Identity this connection was opened for
    pub identity: Identity,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Sender for serialized outbound payloads
    sender: mpsc::Sender<Arc<str>>,
    /// Cancelled once the connection is closed
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle around an existing queue sender.
    pub fn new(identity: Identity, sender: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            connected_at: Utc::now(),
            sender,
            closed: CancellationToken::new(),
        }
    }

    /// Create a handle together with the receiving end of its outbound queue.
    pub fn channel(identity: Identity, buffer: usize) -> (Arc<Self>, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Arc::new(Self::new(identity, tx)), rx)
    }

    /// Queue a payload for this connection without waiting.
    ///
    /// Any failure leaves the connection marked dead.
    pub fn try_deliver(&self, payload: Arc<str>) -> Result<(), DeliveryError> {
        if !self.is_alive() {
            return Err(DeliveryError::Closed);
        }
        match self.sender.try_send(payload) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.mark_closed();
                Err(DeliveryError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                Err(DeliveryError::Closed)
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        !self.closed.is_cancelled() && !self.sender.is_closed()
    }

    /// Mark connection as closed, waking any task waiting in [`Self::closed`].
    pub fn mark_closed(&self) {
        self.closed.cancel();
    }

    /// Resolves once the connection has been marked closed.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }
}
