//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use wavelink_core::error::{AppError, ErrorKind};
use wavelink_core::{AppResult, Identity};
use wavelink_realtime::HandshakeRequest;

/// `?uid=` query parameter carried by the handshake routes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UidQuery {
    /// Caller-asserted identity.
    pub uid: Option<String>,
}

impl UidQuery {
    /// The identity, or a `missing_uid` validation error.
    pub fn identity(&self) -> AppResult<Identity> {
        Identity::parse(self.uid.clone().unwrap_or_default())
    }
}

/// Body of `POST /handshake/send`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendHandshakeRequest {
    /// Handshake kind.
    #[serde(rename = "type", alias = "kind", default)]
    #[validate(length(min = 1, message = "Handshake type is required"))]
    pub kind: String,
    /// Target identity; absent or empty broadcasts.
    #[serde(default, alias = "to_uid")]
    pub to_identity: Option<String>,
    /// Optional note.
    #[serde(default)]
    #[validate(length(max = 1000, message = "Message must be at most 1000 characters"))]
    pub message: Option<String>,
}

impl SendHandshakeRequest {
    /// Parse and validate a raw JSON body.
    pub fn from_body(body: &[u8]) -> AppResult<Self> {
        let request: Self = serde_json::from_slice(body).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, format!("Invalid request body: {e}"), e)
                .with_code("invalid_request")
        })?;
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()).with_code("invalid_request"))?;
        Ok(request)
    }
}

impl From<SendHandshakeRequest> for HandshakeRequest {
    fn from(req: SendHandshakeRequest) -> Self {
        Self {
            kind: req.kind,
            to_identity: req.to_identity,
            message: req.message,
        }
    }
}
