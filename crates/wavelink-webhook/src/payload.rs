//! Chat-platform webhook payload.
//!
//! Only the fields the gate and filters read are modelled; anything else the
//! platform sends is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Event type of a newly posted message.
pub const MESSAGE_NEW: &str = "message.new";

/// Top-level webhook event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type, e.g. `message.new`.
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Message payload for message events.
    #[serde(default)]
    pub message: Option<WebhookMessage>,
    /// Channel the event happened in.
    #[serde(default)]
    pub channel: Option<WebhookChannel>,
    /// Channel CID as sent at the top level.
    #[serde(default)]
    pub cid: String,
    /// Platform timestamp, passed through untouched.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A chat message carried by a message event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookMessage {
    /// Platform message ID.
    #[serde(default)]
    pub id: String,
    /// Message body as typed by the sender.
    #[serde(default)]
    pub text: String,
    /// Sender.
    #[serde(default)]
    pub user: WebhookUser,
    /// Attached files or images, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<WebhookAttachment>,
}

/// Author of a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookUser {
    /// Platform user ID; matches the Wavelink identity.
    #[serde(default)]
    pub id: String,
    /// Platform role, e.g. `user` or `admin`.
    #[serde(default)]
    pub role: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// File or image attached to a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookAttachment {
    /// Attachment type, e.g. `image`.
    #[serde(rename = "type", default)]
    pub attachment_type: String,
    /// Image location for image attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Channel a message was posted in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookChannel {
    /// Channel ID, e.g. `ai-chat-u1`.
    #[serde(default)]
    pub id: String,
    /// Channel type, e.g. `messaging`.
    #[serde(rename = "type", default)]
    pub channel_type: String,
    /// `<type>:<id>`.
    #[serde(default)]
    pub cid: String,
}

impl WebhookEvent {
    /// Parse an event from the raw request body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Whether this event announces a new message.
    pub fn is_message_new(&self) -> bool {
        self.event_type == MESSAGE_NEW
    }
}
