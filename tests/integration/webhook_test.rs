//! Integration tests for the chat platform webhook ingress.

mod helpers;

use std::sync::Arc;

use http::StatusCode;

use helpers::{API_KEY, CountingPipeline, SIGNING_SECRET, TestApp};
use wavelink_webhook::Recommendation;
use wavelink_webhook::signature::sign;

const PATH: &str = "/webhooks/stream";

fn message_body(sender: &str, channel: &str, text: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "message.new",
        "cid": format!("messaging:{channel}"),
        "message": {
            "id": "m1",
            "text": text,
            "user": {"id": sender, "role": "user"}
        },
        "channel": {"id": channel, "type": "messaging", "cid": format!("messaging:{channel}")}
    }))
    .unwrap()
}

async fn deliver(app: &TestApp, id: &str, body: Vec<u8>) -> helpers::TestResponse {
    let signature = sign(SIGNING_SECRET.as_bytes(), &body);
    app.raw_request(
        "POST",
        PATH,
        &[
            ("Content-Type", "application/json"),
            ("X-Webhook-Id", id),
            ("X-Api-Key", API_KEY),
            ("X-Signature", &signature),
        ],
        body,
    )
    .await
}

#[tokio::test]
async fn test_duplicate_delivery_processed_once() {
    let pipeline = Arc::new(CountingPipeline::default());
    let app = TestApp::with_pipeline(pipeline.clone());
    let body = message_body("u1", "ai-chat-u1", "hello");

    let first = deliver(&app, "wh-1", body.clone()).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["status"], "ok");

    let second = deliver(&app, "wh-1", body).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["status"], "already_processed");

    assert_eq!(pipeline.calls(), 1);
    let seen = pipeline.seen.lock().unwrap();
    assert_eq!(seen[0].sender_id, "u1");
    assert_eq!(seen[0].channel_cid, "messaging:ai-chat-u1");
    assert_eq!(seen[0].text, "hello");
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let pipeline = Arc::new(CountingPipeline::default());
    let app = TestApp::with_pipeline(pipeline.clone());

    let response = app
        .raw_request(
            "POST",
            PATH,
            &[("X-Webhook-Id", "wh-2"), ("X-Api-Key", API_KEY)],
            message_body("u1", "ai-chat-u1", "hello"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "missing_signature");
    assert_eq!(pipeline.calls(), 0);
}

#[tokio::test]
async fn test_invalid_signature_rejected() {
    let pipeline = Arc::new(CountingPipeline::default());
    let app = TestApp::with_pipeline(pipeline.clone());
    let body = message_body("u1", "ai-chat-u1", "hello");
    let signature = sign(b"some-other-secret", &body);

    let response = app
        .raw_request("POST", PATH, &[("X-Signature", &signature)], body)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "invalid_signature");
    assert_eq!(pipeline.calls(), 0);
}

#[tokio::test]
async fn test_reserialized_body_fails_signature() {
    let app = TestApp::with_pipeline(Arc::new(CountingPipeline::default()));
    let signed = message_body("u1", "ai-chat-u1", "hello");
    let signature = sign(SIGNING_SECRET.as_bytes(), &signed);
    let value: serde_json::Value = serde_json::from_slice(&signed).unwrap();
    let pretty = serde_json::to_vec_pretty(&value).unwrap();

    let response = app
        .raw_request("POST", PATH, &[("X-Signature", &signature)], pretty)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_api_key_rejected() {
    let app = TestApp::with_pipeline(Arc::new(CountingPipeline::default()));
    let body = message_body("u1", "ai-chat-u1", "hello");
    let signature = sign(SIGNING_SECRET.as_bytes(), &body);

    let response = app
        .raw_request(
            "POST",
            PATH,
            &[("X-Api-Key", "not-the-key"), ("X-Signature", &signature)],
            body,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "invalid_api_key");
}

#[tokio::test]
async fn test_foreign_channel_admitted_but_not_dispatched() {
    let pipeline = Arc::new(CountingPipeline::default());
    let app = TestApp::with_pipeline(pipeline.clone());
    let body = message_body("u1", "general", "hello");

    let response = deliver(&app, "wh-3", body.clone()).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(pipeline.calls(), 0);

    let replay = deliver(&app, "wh-3", body).await;
    assert_eq!(replay.body["status"], "already_processed");
}

#[tokio::test]
async fn test_bot_message_not_dispatched() {
    let pipeline = Arc::new(CountingPipeline::default());
    let app = TestApp::with_pipeline(pipeline.clone());

    let response = deliver(&app, "wh-4", message_body("ai-assistant", "ai-chat-u1", "hi")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(pipeline.calls(), 0);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let app = TestApp::with_pipeline(Arc::new(CountingPipeline::default()));

    let response = deliver(&app, "wh-5", b"{\"type\": ".to_vec()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_json");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let app = TestApp::with_pipeline(Arc::new(CountingPipeline::default()));

    let response = deliver(&app, "wh-6", vec![b' '; 2 * 1024 * 1024]).await;

    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_confirmation_consumes_pending_recommendation() {
    let app = TestApp::new();
    app.state
        .recommendations
        .propose("u1", Recommendation::new("u2", "Bea"));

    let response = deliver(&app, "wh-7", message_body("u1", "ai-chat-u1", "Yes please")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(app.state.recommendations.peek("u1").is_none());
}
