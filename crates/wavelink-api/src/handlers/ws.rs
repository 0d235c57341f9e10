//! WebSocket upgrade handler.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use wavelink_core::Identity;

use crate::dto::request::UidQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /handshake/ws?uid={id} — WebSocket upgrade
///
/// The uid is checked before the upgrade headers so a plain request
/// without it gets the usual `missing_uid` error body.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<UidQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let identity = match query.identity() {
        Ok(identity) => identity,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    ws.on_upgrade(move |socket| handle_ws_connection(state, identity, socket))
}

/// Handles an established WebSocket connection.
///
/// The connection is registered for exactly as long as this task runs: the
/// guard unregisters it on every exit path.
async fn handle_ws_connection(state: AppState, identity: Identity, socket: WebSocket) {
    let (guard, mut outbound_rx) = state.realtime.connect(identity);
    let handle = Arc::clone(guard.handle());
    let conn_id = handle.id;

    info!(
        conn_id = %conn_id,
        identity = %handle.identity,
        "WebSocket connection established"
    );

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut ping = keepalive(state.realtime.config().ping_interval_seconds);

    // Outbound forwarder
    let writer_handle = Arc::clone(&handle);
    let mut writer = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                biased;
                _ = writer_handle.closed() => break,
                payload = outbound_rx.recv() => match payload {
                    Some(payload) => Message::Text(payload.as_ref().into()),
                    None => break,
                },
                _ = tick(&mut ping) => Message::Ping(Bytes::new()),
            };
            if ws_tx.send(frame).await.is_err() {
                break;
            }
        }
        writer_handle.mark_closed();
        let _ = ws_tx.close().await;
    });

    // Inbound frames only signal liveness.
    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(conn_id = %conn_id, error = %e, "WebSocket read error");
                    break;
                }
            },
            _ = &mut writer => break,
        }
    }

    writer.abort();
    drop(guard);

    info!(
        conn_id = %conn_id,
        identity = %handle.identity,
        "WebSocket connection closed"
    );
}

fn keepalive(seconds: u64) -> Option<Interval> {
    (seconds > 0).then(|| {
        let period = Duration::from_secs(seconds);
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    })
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
