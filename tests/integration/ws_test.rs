//! Integration tests for WebSocket subscription and handshake fan-out.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, uid: &str) -> Client {
    let url = format!("ws://{addr}/handshake/ws?uid={uid}");
    let (stream, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("WebSocket connect failed");
    stream
}

/// Next text frame as JSON, or `None` if nothing arrives in time.
async fn next_event(client: &mut Client, wait: Duration) -> Option<Value> {
    loop {
        match tokio::time::timeout(wait, client.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => {
                return Some(serde_json::from_str(text.as_str()).expect("Event is not JSON"));
            }
            Ok(Some(Ok(_))) => continue,
            _ => return None,
        }
    }
}

#[tokio::test]
async fn test_ws_upgrade_without_uid() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/handshake/ws", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "missing_uid");
}

#[tokio::test]
async fn test_broadcast_reaches_others_not_sender() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, "u1").await;
    let mut u2 = connect(addr, "u2").await;
    app.wait_for_active(&["u1", "u2"]).await;

    let active = app.request("GET", "/handshake/active", None).await;
    assert_eq!(active.body, json!({"users": ["u1", "u2"]}));

    let response = app
        .request(
            "POST",
            "/handshake/send?uid=u1",
            Some(json!({"type": "wave", "message": "hi"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let event = next_event(&mut u2, Duration::from_secs(2))
        .await
        .expect("u2 should receive the wave");
    assert_eq!(event["type"], "wave");
    assert_eq!(event["fromIdentity"], "u1");
    assert_eq!(event["message"], "hi");
    assert!(event.get("toIdentity").is_none());
    assert!(event["timestamp"].is_string());

    assert!(next_event(&mut u1, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn test_custom_kind_delivered_verbatim() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let _u1 = connect(addr, "u1").await;
    let mut u2 = connect(addr, "u2").await;
    app.wait_for_active(&["u1", "u2"]).await;

    let response = app
        .request(
            "POST",
            "/handshake/send?uid=u1",
            Some(json!({"type": "hug", "toIdentity": "u2"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let event = next_event(&mut u2, Duration::from_secs(2))
        .await
        .expect("u2 should receive the hug");
    assert_eq!(event["type"], "hug");
    assert_eq!(event["toIdentity"], "u2");
}

#[tokio::test]
async fn test_targeted_handshake_reaches_every_tab_of_target_only() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, "u1").await;
    let mut u2_a = connect(addr, "u2").await;
    let mut u2_b = connect(addr, "u2").await;
    let mut u3 = connect(addr, "u3").await;
    app.wait_for_active(&["u1", "u2", "u3"]).await;
    for _ in 0..200 {
        if app.state.realtime.registry.connection_count() == 4 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    app.request(
        "POST",
        "/handshake/send?uid=u1",
        Some(json!({"type": "fist_bump", "toIdentity": "u2"})),
    )
    .await;

    for tab in [&mut u2_a, &mut u2_b] {
        let event = next_event(tab, Duration::from_secs(2))
            .await
            .expect("every u2 tab should receive the event");
        assert_eq!(event["type"], "fist_bump");
        assert_eq!(event["toIdentity"], "u2");
    }
    assert!(next_event(&mut u1, Duration::from_millis(200)).await.is_none());
    assert!(next_event(&mut u3, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn test_disconnect_unregisters() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let _u1 = connect(addr, "u1").await;
    let mut u2 = connect(addr, "u2").await;
    app.wait_for_active(&["u1", "u2"]).await;

    u2.close(None).await.expect("close failed");
    drop(u2);

    app.wait_for_active(&["u1"]).await;
    let health = app.request("GET", "/health/detailed", None).await;
    assert_eq!(health.body["ws_connections"], 1);
}

#[tokio::test]
async fn test_sends_to_departed_peer_still_succeed() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let u2 = connect(addr, "u2").await;
    app.wait_for_active(&["u2"]).await;
    drop(u2);

    for _ in 0..3 {
        let response = app
            .request("POST", "/handshake/send?uid=u1", Some(json!({"type": "wave"})))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
    app.wait_for_active(&[]).await;
}

#[tokio::test]
async fn test_shutdown_closes_idle_sockets() {
    let app = helpers::TestApp::new();
    let addr = app.spawn().await;

    let mut u1 = connect(addr, "u1").await;
    app.wait_for_active(&["u1"]).await;

    app.state.realtime.shutdown();

    let closed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match u1.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(closed.is_ok(), "socket stayed open after shutdown");
}
