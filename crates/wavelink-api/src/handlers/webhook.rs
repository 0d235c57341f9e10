//! Chat platform webhook ingress.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use bytes::Bytes;

use wavelink_webhook::{GateOutcome, WebhookHeaders};

use crate::dto::response::WebhookAck;
use crate::error::ApiError;
use crate::state::AppState;

const WEBHOOK_ID: &str = "x-webhook-id";
const API_KEY: &str = "x-api-key";
const SIGNATURE: &str = "x-signature";

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// POST /webhooks/stream
///
/// The body is taken as raw bytes; the signature covers exactly these.
pub async fn stream_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, ApiError> {
    let webhook_headers = WebhookHeaders {
        webhook_id: header(&headers, WEBHOOK_ID),
        api_key: header(&headers, API_KEY),
        signature: header(&headers, SIGNATURE),
    };

    tracing::debug!(
        webhook_id = webhook_headers.webhook_id.as_deref().unwrap_or(""),
        signed = webhook_headers.signature.is_some(),
        bytes = body.len(),
        "Incoming webhook"
    );

    let ack = match state.webhook.handle(&webhook_headers, &body).await? {
        GateOutcome::Duplicate => WebhookAck::already_processed(),
        GateOutcome::Ignored(_) | GateOutcome::Dispatched => WebhookAck::ok(),
    };
    Ok(Json(ack))
}
