//! Response DTOs.

use serde::{Deserialize, Serialize};

use wavelink_realtime::metrics::MetricsSnapshot;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identities currently holding a WebSocket connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveUsersResponse {
    /// Connected identities, sorted.
    pub users: Vec<String>,
}

/// Webhook acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAck {
    /// `ok` or `already_processed`.
    pub status: String,
}

impl WebhookAck {
    /// Delivery accepted.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Delivery ID seen before; nothing was done.
    pub fn already_processed() -> Self {
        Self {
            status: "already_processed".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Distinct connected identities.
    pub online_users: usize,
    /// Real-time counters.
    pub metrics: MetricsSnapshot,
}
