//! Handshake send and presence handlers.

use axum::Json;
use axum::extract::{Query, State};
use bytes::Bytes;

use wavelink_core::Identity;

use crate::dto::request::{SendHandshakeRequest, UidQuery};
use crate::dto::response::{ActiveUsersResponse, MessageResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /handshake/send?uid={id}
///
/// The uid is checked before the body so a missing sender is reported as
/// `missing_uid` even when the body is also malformed.
pub async fn send_handshake(
    State(state): State<AppState>,
    Query(query): Query<UidQuery>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    let from = query.identity()?;
    let request = SendHandshakeRequest::from_body(&body)?;

    state
        .realtime
        .handshakes
        .send_handshake(from.as_str(), request.into())?;

    Ok(Json(MessageResponse::new("Handshake sent successfully")))
}

/// GET /handshake/active
pub async fn active_users(State(state): State<AppState>) -> Json<ActiveUsersResponse> {
    let users = state
        .realtime
        .handshakes
        .active_identities()
        .into_iter()
        .map(Identity::into_inner)
        .collect();
    Json(ActiveUsersResponse { users })
}
