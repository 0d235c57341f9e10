//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use wavelink_api::{AppState, build_app};
use wavelink_core::AppResult;
use wavelink_core::config::AppConfig;
use wavelink_webhook::{InboundChatMessage, ResponsePipeline};

pub const API_KEY: &str = "test-api-key";
pub const SIGNING_SECRET: &str = "test-signing-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state behind the router
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with the bundled response pipeline
    pub fn new() -> Self {
        Self::from_state(AppState::new(test_config()))
    }

    /// Create a test application whose webhook gate dispatches to `pipeline`
    pub fn with_pipeline(pipeline: Arc<dyn ResponsePipeline>) -> Self {
        Self::from_state(AppState::with_pipeline(test_config(), pipeline))
    }

    fn from_state(state: AppState) -> Self {
        let router = build_app(state.clone(), &state.config.server.cors);
        Self { router, state }
    }

    /// Serve the router on an ephemeral local port
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr
    }

    /// Make a JSON request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body = body
            .map(|b| serde_json::to_vec(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.raw_request(method, path, &[("Content-Type", "application/json")], body)
            .await
    }

    /// Make a request with explicit headers and raw body bytes
    pub async fn raw_request(
        &self,
        method: &str,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Wait until exactly `identities` are connected, in sorted order
    pub async fn wait_for_active(&self, identities: &[&str]) {
        for _ in 0..200 {
            let active: Vec<String> = self
                .state
                .realtime
                .registry
                .snapshot()
                .into_iter()
                .map(|i| i.into_inner())
                .collect();
            if active == identities {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("identities never became {identities:?}");
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `error` tag of an error body
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Configuration with webhook secrets set
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.webhook.api_key = API_KEY.to_string();
    config.webhook.signing_secret = SIGNING_SECRET.to_string();
    config.realtime.ping_interval_seconds = 0;
    config
}

/// Pipeline that counts the messages it receives
#[derive(Default)]
pub struct CountingPipeline {
    calls: AtomicUsize,
    pub seen: std::sync::Mutex<Vec<InboundChatMessage>>,
}

impl CountingPipeline {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponsePipeline for CountingPipeline {
    async fn handle(&self, message: InboundChatMessage) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(message);
        Ok(())
    }
}
