//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use wavelink_core::config::AppConfig;
use wavelink_realtime::RealtimeEngine;
use wavelink_webhook::{DeferredPipeline, RecommendationSlots, ResponsePipeline, WebhookGate};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Connection registry, broadcaster and handshake coordinator
    pub realtime: RealtimeEngine,
    /// Inbound webhook gate
    pub webhook: Arc<WebhookGate>,
    /// Pending introductions awaiting confirmation
    pub recommendations: Arc<RecommendationSlots>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds state with the bundled [`DeferredPipeline`].
    pub fn new(config: AppConfig) -> Self {
        let recommendations = Arc::new(RecommendationSlots::new());
        let pipeline = Arc::new(DeferredPipeline::new(Arc::clone(&recommendations)));
        Self::assemble(config, pipeline, recommendations)
    }

    /// Builds state that hands dispatched webhook messages to `pipeline`.
    pub fn with_pipeline(config: AppConfig, pipeline: Arc<dyn ResponsePipeline>) -> Self {
        Self::assemble(config, pipeline, Arc::new(RecommendationSlots::new()))
    }

    fn assemble(
        config: AppConfig,
        pipeline: Arc<dyn ResponsePipeline>,
        recommendations: Arc<RecommendationSlots>,
    ) -> Self {
        let realtime = RealtimeEngine::new(config.realtime.clone());
        let webhook = Arc::new(WebhookGate::from_config(&config.webhook, pipeline));
        Self {
            config: Arc::new(config),
            realtime,
            webhook,
            recommendations,
            started_at: Instant::now(),
        }
    }
}
