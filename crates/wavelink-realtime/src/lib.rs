//! # wavelink-realtime
//!
//! Process-local publish/subscribe hub for Wavelink. Provides:
//!
//! - A connection registry mapping subscriber identities to their live
//!   WebSocket connections
//! - An event broadcaster that fans handshake events out and prunes
//!   connections that fail to receive
//! - A handshake coordinator translating send requests into timestamped
//!   events
//!
//! Nothing here is persisted and nothing is shared across processes.

pub mod broadcast;
pub mod connection;
pub mod handshake;
pub mod metrics;
pub mod server;

pub use broadcast::publisher::{EventBroadcaster, PruneHook, PublishReport};
pub use connection::handle::{ConnectionHandle, ConnectionId, DeliveryError};
pub use connection::registry::{ConnectionGuard, ConnectionRegistry};
pub use handshake::coordinator::HandshakeCoordinator;
pub use handshake::event::{HandshakeEvent, HandshakeKind, HandshakeRequest};
pub use metrics::RealtimeMetrics;
pub use server::RealtimeEngine;
