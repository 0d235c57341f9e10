//! Handshake domain: event model and the coordinator that publishes it.

pub mod coordinator;
pub mod event;
