//! Event fan-out to registered connections.

pub mod publisher;
