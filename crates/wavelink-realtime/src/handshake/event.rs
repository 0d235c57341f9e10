//! Handshake event and request types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use wavelink_core::{AppError, Identity};

/// Handshake gesture.
///
/// The common gestures have their own variants; any other non-empty tag is
/// carried verbatim in [`HandshakeKind::Other`] and round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandshakeKind {
    /// A wave.
    Wave,
    /// A high five.
    HighFive,
    /// A fist bump.
    FistBump,
    /// Any other client-defined gesture.
    Other(String),
}

impl HandshakeKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wave => "wave",
            Self::HighFive => "high_five",
            Self::FistBump => "fist_bump",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for HandshakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandshakeKind {
    type Err = AppError;

    /// Surrounding whitespace is ignored; a blank tag is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(AppError::validation("type is required")),
            "wave" => Ok(Self::Wave),
            "high_five" => Ok(Self::HighFive),
            "fist_bump" => Ok(Self::FistBump),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl Serialize for HandshakeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HandshakeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: AppError| de::Error::custom(e.message))
    }
}

/// A caller's request to send a handshake.
///
/// Fields arrive unvalidated; [`crate::HandshakeCoordinator`] rejects a
/// blank `kind` before anything is published.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeRequest {
    /// Gesture name.
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: String,
    /// Target identity; absent or empty means broadcast.
    #[serde(default, alias = "to_uid", skip_serializing_if = "Option::is_none")]
    pub to_identity: Option<String>,
    /// Optional free-text message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An immutable, fire-and-forget handshake event as delivered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeEvent {
    /// Gesture.
    #[serde(rename = "type")]
    pub kind: HandshakeKind,
    /// Sender.
    pub from_identity: Identity,
    /// Target; `None` means broadcast to everyone but the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_identity: Option<Identity>,
    /// Optional message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Creation instant, assigned server-side.
    pub timestamp: DateTime<Utc>,
}

impl HandshakeEvent {
    /// Whether this event targets every identity except the sender.
    pub fn is_broadcast(&self) -> bool {
        self.to_identity.is_none()
    }
}
