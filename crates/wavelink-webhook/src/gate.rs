//! Webhook gate — authenticates, deduplicates and dispatches deliveries.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use wavelink_core::config::WebhookConfig;
use wavelink_core::error::{AppError, ErrorKind};
use wavelink_core::AppResult;

use crate::filter::{DispatchFilter, SkipReason};
use crate::ledger::{Admission, DeliveryLedger};
use crate::payload::WebhookEvent;
use crate::pipeline::ResponsePipeline;
use crate::signature::{constant_time_eq, SignatureVerifier};

/// Delivery headers the gate inspects.
#[derive(Debug, Clone, Default)]
pub struct WebhookHeaders {
    /// `X-Webhook-Id`.
    pub webhook_id: Option<String>,
    /// `X-Api-Key`.
    pub api_key: Option<String>,
    /// `X-Signature`.
    pub signature: Option<String>,
}

impl WebhookHeaders {
    fn webhook_id(&self) -> &str {
        self.webhook_id.as_deref().unwrap_or_default()
    }
}

/// What happened to an accepted delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Seen before; acknowledged without side effects.
    Duplicate,
    /// Admitted but filtered out before the pipeline.
    Ignored(SkipReason),
    /// Handed to the response pipeline.
    Dispatched,
}

/// Entry point for inbound chat-platform webhooks.
pub struct WebhookGate {
    api_key: String,
    verifier: SignatureVerifier,
    ledger: DeliveryLedger,
    filter: DispatchFilter,
    pipeline: Arc<dyn ResponsePipeline>,
}

impl std::fmt::Debug for WebhookGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookGate")
            .field("verifier", &self.verifier)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl WebhookGate {
    /// Assemble a gate from its parts.
    pub fn new(
        api_key: impl Into<String>,
        verifier: SignatureVerifier,
        ledger: DeliveryLedger,
        filter: DispatchFilter,
        pipeline: Arc<dyn ResponsePipeline>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            verifier,
            ledger,
            filter,
            pipeline,
        }
    }

    /// Build a gate from configuration.
    pub fn from_config(config: &WebhookConfig, pipeline: Arc<dyn ResponsePipeline>) -> Self {
        if config.signing_secret.is_empty() {
            warn!("Webhook signing secret is not configured; every delivery will be rejected");
        }
        Self::new(
            config.api_key.clone(),
            SignatureVerifier::new(&config.signing_secret),
            DeliveryLedger::new(
                config.dedup_capacity,
                Duration::from_secs(config.dedup_ttl_seconds),
            ),
            DispatchFilter::from_config(config),
            pipeline,
        )
    }

    /// Check the API key (when sent) and the mandatory signature over the
    /// exact raw body.
    pub fn authenticate(&self, headers: &WebhookHeaders, raw_body: &[u8]) -> AppResult<()> {
        if let Some(key) = headers.api_key.as_deref().filter(|k| !k.is_empty()) {
            if !constant_time_eq(key, &self.api_key) {
                return Err(AppError::authentication("API key validation failed")
                    .with_code("invalid_api_key"));
            }
        }

        let signature = headers
            .signature
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AppError::authentication("X-Signature header is required")
                    .with_code("missing_signature")
            })?;

        if !self.verifier.verify(raw_body, signature) {
            return Err(AppError::authentication("Webhook signature verification failed")
                .with_code("invalid_signature"));
        }
        Ok(())
    }

    /// Record the delivery identifier, admitting it at most once.
    pub async fn admit(&self, webhook_id: &str) -> Admission {
        self.ledger.admit(webhook_id).await
    }

    /// Run a delivery through authenticate, admit, parse, filter and the
    /// pipeline, in that order.
    ///
    /// Authentication failures abort before the ledger is touched, so a
    /// forged delivery cannot burn a legitimate identifier. Pipeline
    /// failures are logged and still yield [`GateOutcome::Dispatched`].
    pub async fn handle(&self, headers: &WebhookHeaders, raw_body: &[u8]) -> AppResult<GateOutcome> {
        let webhook_id = headers.webhook_id();

        if let Err(e) = self.authenticate(headers, raw_body) {
            warn!(webhook_id = %webhook_id, code = e.code(), "Webhook rejected");
            return Err(e);
        }

        if self.admit(webhook_id).await == Admission::Duplicate {
            info!(webhook_id = %webhook_id, "Duplicate webhook, already processed");
            return Ok(GateOutcome::Duplicate);
        }

        let event = WebhookEvent::from_slice(raw_body).map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Failed to parse webhook payload", e)
                .with_code("invalid_json")
        })?;

        let message = match self.filter.evaluate(&event) {
            Ok(message) => message,
            Err(reason) => {
                debug!(webhook_id = %webhook_id, reason = %reason, "Webhook event skipped");
                return Ok(GateOutcome::Ignored(reason));
            }
        };

        let sender = message.sender_id.clone();
        if let Err(e) = self.pipeline.handle(message).await {
            error!(
                webhook_id = %webhook_id,
                identity = %sender,
                error = %e,
                "Response pipeline failed"
            );
        }

        debug!(webhook_id = %webhook_id, identity = %sender, "Webhook dispatched");
        Ok(GateOutcome::Dispatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::filter::InboundChatMessage;
    use crate::signature::sign;

    const SECRET: &str = "whsec";
    const API_KEY: &str = "key-123";

    #[derive(Default)]
    struct CountingPipeline {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ResponsePipeline for CountingPipeline {
        async fn handle(&self, _message: InboundChatMessage) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::external("model unavailable"));
            }
            Ok(())
        }
    }

    fn gate(pipeline: Arc<CountingPipeline>) -> WebhookGate {
        let config = WebhookConfig {
            api_key: API_KEY.to_string(),
            signing_secret: SECRET.to_string(),
            ..WebhookConfig::default()
        };
        WebhookGate::from_config(&config, pipeline)
    }

    fn body(channel: &str) -> Vec<u8> {
        format!(
            r#"{{"type":"message.new","message":{{"id":"m1","text":"hi","user":{{"id":"u1","role":"user"}}}},"channel":{{"id":"{channel}","type":"messaging","cid":"messaging:{channel}"}}}}"#
        )
        .into_bytes()
    }

    fn headers(id: &str, body: &[u8]) -> WebhookHeaders {
        WebhookHeaders {
            webhook_id: Some(id.to_string()),
            api_key: Some(API_KEY.to_string()),
            signature: Some(sign(SECRET.as_bytes(), body)),
        }
    }

    #[tokio::test]
    async fn test_duplicate_delivery_dispatched_once() {
        let pipeline = Arc::new(CountingPipeline::default());
        let gate = gate(Arc::clone(&pipeline));
        let body = body("ai-chat-u1");
        let headers = headers("wh-1", &body);

        assert_eq!(gate.handle(&headers, &body).await.unwrap(), GateOutcome::Dispatched);
        assert_eq!(gate.handle(&headers, &body).await.unwrap(), GateOutcome::Duplicate);
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_signature_rejected() {
        let pipeline = Arc::new(CountingPipeline::default());
        let gate = gate(Arc::clone(&pipeline));
        let body = body("ai-chat-u1");
        let mut headers = headers("wh-2", &body);
        headers.signature = None;

        let err = gate.handle(&headers, &body).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.code(), "missing_signature");
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_delivery_does_not_consume_id() {
        let pipeline = Arc::new(CountingPipeline::default());
        let gate = gate(Arc::clone(&pipeline));
        let body = body("ai-chat-u1");
        let mut forged = headers("wh-3", &body);
        forged.signature = Some(sign(b"wrong", &body));

        let err = gate.handle(&forged, &body).await.unwrap_err();
        assert_eq!(err.code(), "invalid_signature");

        let genuine = headers("wh-3", &body);
        assert_eq!(gate.handle(&genuine, &body).await.unwrap(), GateOutcome::Dispatched);
    }

    #[tokio::test]
    async fn test_api_key_checked_only_when_present() {
        let gate = gate(Arc::new(CountingPipeline::default()));
        let body = body("ai-chat-u1");

        let mut wrong = headers("wh-4", &body);
        wrong.api_key = Some("nope".to_string());
        assert_eq!(
            gate.authenticate(&wrong, &body).unwrap_err().code(),
            "invalid_api_key"
        );

        let mut absent = headers("wh-4", &body);
        absent.api_key = None;
        assert!(gate.authenticate(&absent, &body).is_ok());
    }

    #[tokio::test]
    async fn test_foreign_channel_admitted_but_not_dispatched() {
        let pipeline = Arc::new(CountingPipeline::default());
        let gate = gate(Arc::clone(&pipeline));
        let body = body("general");
        let headers = headers("wh-5", &body);

        let outcome = gate.handle(&headers, &body).await.unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Ignored(SkipReason::ForeignChannel("general".to_string()))
        );
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gate.admit("wh-5").await, Admission::Duplicate);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_client_error() {
        let gate = gate(Arc::new(CountingPipeline::default()));
        let body = b"{broken".to_vec();
        let headers = headers("wh-6", &body);

        let err = gate.handle(&headers, &body).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Serialization);
        assert_eq!(err.code(), "invalid_json");
    }

    #[tokio::test]
    async fn test_pipeline_failure_still_dispatched() {
        let pipeline = Arc::new(CountingPipeline {
            fail: true,
            ..CountingPipeline::default()
        });
        let gate = gate(Arc::clone(&pipeline));
        let body = body("ai-chat-u1");
        let headers = headers("wh-7", &body);

        assert_eq!(gate.handle(&headers, &body).await.unwrap(), GateOutcome::Dispatched);
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_webhook_id_never_deduplicated() {
        let pipeline = Arc::new(CountingPipeline::default());
        let gate = gate(Arc::clone(&pipeline));
        let body = body("ai-chat-u1");
        let mut headers = headers("", &body);
        headers.webhook_id = None;

        gate.handle(&headers, &body).await.unwrap();
        gate.handle(&headers, &body).await.unwrap();
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 2);
    }
}
