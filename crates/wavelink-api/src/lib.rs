//! # wavelink-api
//!
//! HTTP API layer for Wavelink built on Axum.
//!
//! Provides the handshake endpoints, the WebSocket upgrade, the chat
//! platform webhook ingress, middleware (CORS, logging), DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
