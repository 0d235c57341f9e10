//! Response pipeline seam.
//!
//! The gate hands every dispatched message to a [`ResponsePipeline`]. The
//! language-model pipeline that composes replies lives outside this crate;
//! [`DeferredPipeline`] is the in-process implementation that records the
//! message and settles confirmation replies against pending
//! recommendations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use wavelink_core::AppResult;

use crate::filter::InboundChatMessage;
use crate::recommendation::RecommendationSlots;

/// Replies recognised as accepting a pending introduction.
const CONFIRMATION_WORDS: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "sure",
    "okay",
    "ok",
    "connect",
    "meet them",
];

/// Downstream consumer of dispatched chat messages.
#[async_trait]
pub trait ResponsePipeline: Send + Sync {
    /// Handle one message. Errors are logged by the caller and never
    /// change the webhook acknowledgement.
    async fn handle(&self, message: InboundChatMessage) -> AppResult<()>;
}

/// Whether `text` accepts a pending introduction.
///
/// Matches a confirmation word as the whole message, as its first word or
/// as its last word, ignoring case and surrounding whitespace.
pub fn is_confirmation(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    CONFIRMATION_WORDS.iter().any(|word| {
        text == *word
            || text
                .strip_prefix(word)
                .is_some_and(|rest| rest.starts_with(' '))
            || text
                .strip_suffix(word)
                .is_some_and(|rest| rest.ends_with(' '))
    })
}

/// Pipeline that logs messages and consumes recommendations on confirmation.
#[derive(Debug, Clone)]
pub struct DeferredPipeline {
    slots: Arc<RecommendationSlots>,
}

impl DeferredPipeline {
    /// Create a pipeline settling confirmations against `slots`.
    pub fn new(slots: Arc<RecommendationSlots>) -> Self {
        Self { slots }
    }

    /// The recommendation slots this pipeline consumes from.
    pub fn slots(&self) -> &Arc<RecommendationSlots> {
        &self.slots
    }
}

#[async_trait]
impl ResponsePipeline for DeferredPipeline {
    async fn handle(&self, message: InboundChatMessage) -> AppResult<()> {
        if is_confirmation(&message.text) {
            match self.slots.take(&message.sender_id) {
                Some(rec) => info!(
                    identity = %message.sender_id,
                    candidate = %rec.candidate_id,
                    channel = %message.channel_cid,
                    "Introduction confirmed"
                ),
                None => info!(
                    identity = %message.sender_id,
                    channel = %message.channel_cid,
                    "Confirmation without pending recommendation"
                ),
            }
            return Ok(());
        }

        info!(
            identity = %message.sender_id,
            channel = %message.channel_cid,
            length = message.text.len(),
            "Chat message queued for response"
        );
        Ok(())
    }
}
