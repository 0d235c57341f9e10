//! Route definitions for the Wavelink HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Largest webhook body accepted.
pub const WEBHOOK_BODY_LIMIT: usize = 1024 * 1024;

/// Build the Axum router with all routes and request logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(handshake_routes())
        .merge(webhook_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and detailed status
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Handshake send, WebSocket subscription, presence
fn handshake_routes() -> Router<AppState> {
    Router::new()
        .route("/handshake/send", post(handlers::handshake::send_handshake))
        .route("/handshake/ws", get(handlers::ws::ws_upgrade))
        .route("/handshake/active", get(handlers::handshake::active_users))
}

/// Chat platform webhook ingress
fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/stream", post(handlers::webhook::stream_webhook))
        .layer(DefaultBodyLimit::max(WEBHOOK_BODY_LIMIT))
}
