//! WebSocket connection lifecycle: handles and the identity registry.

pub mod handle;
pub mod registry;
