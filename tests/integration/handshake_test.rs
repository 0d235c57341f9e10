//! Integration tests for the handshake HTTP endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/health/detailed", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ws_connections"], 0);
    assert_eq!(response.body["online_users"], 0);
    assert!(response.body["metrics"]["events_published"].is_u64());
}

#[tokio::test]
async fn test_send_without_uid() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/handshake/send", Some(json!({"type": "wave"})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "missing_uid");
}

#[tokio::test]
async fn test_send_with_empty_uid() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/handshake/send?uid=", Some(json!({"type": "wave"})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "missing_uid");
}

#[tokio::test]
async fn test_send_malformed_body() {
    let app = helpers::TestApp::new();

    let response = app
        .raw_request(
            "POST",
            "/handshake/send?uid=u1",
            &[("Content-Type", "application/json")],
            b"{not json".to_vec(),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_request");
}

#[tokio::test]
async fn test_send_custom_kind() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/handshake/send?uid=u1", Some(json!({"type": "salute"})))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.state.realtime.metrics.snapshot().events_published, 1);
}

#[tokio::test]
async fn test_send_blank_kind() {
    let app = helpers::TestApp::new();

    let response = app
        .request("POST", "/handshake/send?uid=u1", Some(json!({"type": "   "})))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_request");
}

#[tokio::test]
async fn test_send_message_too_long() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/handshake/send?uid=u1",
            Some(json!({"type": "wave", "message": "x".repeat(1001)})),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "invalid_request");
}

#[tokio::test]
async fn test_send_with_nobody_connected_succeeds() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/handshake/send?uid=u1",
            Some(json!({"type": "high_five", "toIdentity": "u2", "message": "hey"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Handshake sent successfully");
    assert_eq!(app.state.realtime.metrics.snapshot().events_published, 1);
}

#[tokio::test]
async fn test_send_accepts_legacy_field_names() {
    let app = helpers::TestApp::new();

    let response = app
        .request(
            "POST",
            "/handshake/send?uid=u1",
            Some(json!({"kind": "fist_bump", "to_uid": "u2"})),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_active_users_empty() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/handshake/active", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"users": []}));
}
