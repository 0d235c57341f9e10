//! Route handlers organized by domain.

pub mod handshake;
pub mod health;
pub mod webhook;
pub mod ws;
