//! Webhook ingress configuration.

use serde::{Deserialize, Serialize};

/// Chat-platform webhook settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Platform API key; an `X-Api-Key` header, when sent, must equal it.
    #[serde(default)]
    pub api_key: String,
    /// Shared secret for the `X-Signature` HMAC. Empty means every
    /// delivery fails verification.
    #[serde(default)]
    pub signing_secret: String,
    /// Maximum number of remembered delivery identifiers.
    #[serde(default = "default_dedup_capacity")]
    pub dedup_capacity: u64,
    /// How long a delivery identifier is remembered, in seconds.
    #[serde(default = "default_dedup_ttl")]
    pub dedup_ttl_seconds: u64,
    /// Sender identities whose messages are never forwarded.
    #[serde(default = "default_bot_identities")]
    pub bot_identities: Vec<String>,
    /// Sender role whose messages are never forwarded.
    #[serde(default = "default_bot_role")]
    pub bot_role: String,
    /// Channel id prefix of conversations the pipeline answers in.
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            signing_secret: String::new(),
            dedup_capacity: default_dedup_capacity(),
            dedup_ttl_seconds: default_dedup_ttl(),
            bot_identities: default_bot_identities(),
            bot_role: default_bot_role(),
            channel_prefix: default_channel_prefix(),
        }
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("api_key", &mask(&self.api_key))
            .field("signing_secret", &mask(&self.signing_secret))
            .field("dedup_capacity", &self.dedup_capacity)
            .field("dedup_ttl_seconds", &self.dedup_ttl_seconds)
            .field("bot_identities", &self.bot_identities)
            .field("bot_role", &self.bot_role)
            .field("channel_prefix", &self.channel_prefix)
            .finish()
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

fn default_dedup_capacity() -> u64 {
    100_000
}

fn default_dedup_ttl() -> u64 {
    86_400
}

fn default_bot_identities() -> Vec<String> {
    vec!["chatbot".to_string(), "ai-assistant".to_string()]
}

fn default_bot_role() -> String {
    "admin".to_string()
}

fn default_channel_prefix() -> String {
    "ai-chat-".to_string()
}
