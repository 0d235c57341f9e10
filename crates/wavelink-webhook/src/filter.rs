//! Dispatch filter: pure predicates deciding which admitted events reach
//! the response pipeline.

use std::fmt;

use wavelink_core::config::WebhookConfig;

use crate::payload::WebhookEvent;

/// A message the response pipeline should answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChatMessage {
    /// Channel ID the reply goes to.
    pub channel_id: String,
    /// Full channel CID (`<type>:<id>`).
    pub channel_cid: String,
    /// Message text.
    pub text: String,
    /// Sender's platform user ID.
    pub sender_id: String,
}

/// Why an admitted event was not dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a `message.new` event.
    NotMessageNew(String),
    /// `message.new` without a message body.
    MissingMessage,
    /// No channel attached to the event.
    MissingChannel,
    /// Sent by the bot itself or an admin.
    BotSender(String),
    /// Channel outside the answered naming convention.
    ForeignChannel(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMessageNew(kind) => write!(f, "event type {kind:?} is not handled"),
            Self::MissingMessage => write!(f, "event carries no message"),
            Self::MissingChannel => write!(f, "event carries no channel"),
            Self::BotSender(id) => write!(f, "message from bot sender {id}"),
            Self::ForeignChannel(id) => write!(f, "channel {id} is not an assistant channel"),
        }
    }
}

/// Filter built from webhook configuration.
#[derive(Debug, Clone)]
pub struct DispatchFilter {
    bot_identities: Vec<String>,
    bot_role: String,
    channel_prefix: String,
}

impl DispatchFilter {
    /// Create a filter from explicit bot identities, bot role and channel
    /// prefix. An empty `bot_role` matches no sender.
    pub fn new(
        bot_identities: Vec<String>,
        bot_role: impl Into<String>,
        channel_prefix: impl Into<String>,
    ) -> Self {
        Self {
            bot_identities,
            bot_role: bot_role.into(),
            channel_prefix: channel_prefix.into(),
        }
    }

    /// Create a filter from the `[webhook]` configuration section.
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self::new(
            config.bot_identities.clone(),
            config.bot_role.clone(),
            config.channel_prefix.clone(),
        )
    }

    /// Whether `sender_id`/`role` belongs to a bot or admin account.
    pub fn is_bot(&self, sender_id: &str, role: &str) -> bool {
        (!self.bot_role.is_empty() && role == self.bot_role)
            || self.bot_identities.iter().any(|bot| bot == sender_id)
    }

    /// Whether the pipeline answers in `channel_id`.
    pub fn is_assistant_channel(&self, channel_id: &str) -> bool {
        channel_id.starts_with(&self.channel_prefix)
    }

    /// Apply every predicate in order.
    pub fn evaluate(&self, event: &WebhookEvent) -> Result<InboundChatMessage, SkipReason> {
        if !event.is_message_new() {
            return Err(SkipReason::NotMessageNew(event.event_type.clone()));
        }
        let message = event.message.as_ref().ok_or(SkipReason::MissingMessage)?;
        let channel = event.channel.as_ref().ok_or(SkipReason::MissingChannel)?;

        if self.is_bot(&message.user.id, &message.user.role) {
            return Err(SkipReason::BotSender(message.user.id.clone()));
        }
        if !self.is_assistant_channel(&channel.id) {
            return Err(SkipReason::ForeignChannel(channel.id.clone()));
        }

        Ok(InboundChatMessage {
            channel_id: channel.id.clone(),
            channel_cid: channel.cid.clone(),
            text: message.text.clone(),
            sender_id: message.user.id.clone(),
        })
    }
}
