//! Integration tests for WebSocket connection and messaging.

mod helpers;

use axum::http::StatusCode;
use futures::SinkExt;
use serde_json::json;
use tokio_tungstenite::tungstenite;

use helpers::{TestServer, expect_silence, next_json, send_json};
use teamcollab_core::config::AppConfig;
use teamcollab_core::types::UserId;
use teamcollab_entity::user::UserRole;

#[tokio::test]
async fn test_ws_upgrade_without_upgrade_headers() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/ws", None, None).await;

    assert!(
        response.status.is_client_error(),
        "Expected a 4xx, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_handshake_with_bad_token_is_refused() {
    let server = TestServer::spawn().await;

    match tokio_tungstenite::connect_async(server.ws_url("garbage")).await {
        Ok(_) => panic!("handshake should be refused"),
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), StatusCode::UNAUTHORIZED.as_u16());
        }
        Err(other) => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.app.state.realtime.connections.connection_count(), 0);
    server.stop().await;
}

#[tokio::test]
async fn test_direct_message_with_ack() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;
    let mut bob = server.connect("bob").await;

    send_json(
        &mut alice,
        json!({"event": "message", "data": {"content": "hi", "toUserId": "bob"}, "ack": 7}),
    )
    .await;

    let received = next_json(&mut bob).await;
    assert_eq!(received["event"], "message");
    assert_eq!(received["data"]["sender"], "alice");
    assert_eq!(received["data"]["receiver"], "bob");
    assert_eq!(received["data"]["content"], "hi");
    assert_eq!(received["data"]["status"], "sent");

    let echoed = next_json(&mut alice).await;
    assert_eq!(echoed["event"], "message");
    assert_eq!(echoed["data"]["id"], received["data"]["id"]);

    let ack = next_json(&mut alice).await;
    assert_eq!(ack["event"], "ack");
    assert_eq!(ack["id"], 7);
    assert_eq!(ack["data"]["ok"], true);
    assert_eq!(ack["data"]["message"]["id"], received["data"]["id"]);

    expect_silence(&mut bob).await;
    server.stop().await;
}

#[tokio::test]
async fn test_read_receipt_is_broadcast() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;
    let mut bob = server.connect("bob").await;

    send_json(
        &mut alice,
        json!({"event": "message", "data": {"content": "ping", "toUserId": "bob"}}),
    )
    .await;
    let message = next_json(&mut bob).await;
    next_json(&mut alice).await;
    let id = message["data"]["id"].clone();

    send_json(&mut bob, json!({"event": "read", "data": {"messageIds": [id]}})).await;

    for ws in [&mut alice, &mut bob] {
        let read = next_json(ws).await;
        assert_eq!(read["event"], "read");
        assert_eq!(read["data"]["messageId"], id);
        assert_eq!(read["data"]["userId"], "bob");
    }
    server.stop().await;
}

#[tokio::test]
async fn test_room_join_typing_and_leave() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;
    let mut bob = server.connect("bob").await;

    send_json(&mut alice, json!({"event": "join", "data": "r1"})).await;
    let joined = next_json(&mut alice).await;
    assert_eq!(joined["event"], "system");
    assert_eq!(joined["data"], json!({"type": "join", "userId": "alice"}));

    send_json(&mut bob, json!({"event": "join", "data": {"roomId": "r1"}})).await;
    assert_eq!(next_json(&mut bob).await["data"]["userId"], "bob");
    assert_eq!(next_json(&mut alice).await["data"]["userId"], "bob");

    send_json(
        &mut bob,
        json!({"event": "typing", "data": {"roomId": "r1", "isTyping": true}}),
    )
    .await;
    let typing = next_json(&mut alice).await;
    assert_eq!(typing["event"], "typing");
    assert_eq!(
        typing["data"],
        json!({"userId": "bob", "isTyping": true, "roomId": "r1"})
    );
    expect_silence(&mut bob).await;

    send_json(&mut bob, json!({"event": "leave", "data": "r1"})).await;
    let left = next_json(&mut alice).await;
    assert_eq!(left["data"], json!({"type": "leave", "userId": "bob"}));

    send_json(
        &mut alice,
        json!({"event": "message", "data": {"content": "still here?", "roomId": "r1"}}),
    )
    .await;
    assert_eq!(next_json(&mut alice).await["data"]["content"], "still here?");
    expect_silence(&mut bob).await;
    server.stop().await;
}

#[tokio::test]
async fn test_task_created_over_rest_reaches_sockets() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;
    let token = server.app.token("bob", UserRole::User);

    let response = server
        .app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({"title": "Review PR"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let event = next_json(&mut alice).await;
    assert_eq!(event["event"], "taskCreated");
    assert_eq!(event["data"]["title"], "Review PR");
    assert_eq!(event["data"]["createdBy"], "bob");
    server.stop().await;
}

#[tokio::test]
async fn test_invalid_frames_are_ignored() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;

    send_json(&mut alice, json!({"event": "bogus", "data": {}})).await;
    send_json(&mut alice, json!({"event": "message", "data": {"content": ""}})).await;
    alice
        .send(tungstenite::Message::text("not json"))
        .await
        .unwrap();

    expect_silence(&mut alice).await;
    assert_eq!(server.app.state.realtime.connections.connection_count(), 1);
    server.stop().await;
}

#[tokio::test]
async fn test_disconnect_cleans_up() {
    let server = TestServer::spawn().await;
    let alice = server.connect("alice").await;
    let mut bob = server.connect("bob").await;

    send_json(&mut bob, json!({"event": "join", "data": "r1"})).await;
    next_json(&mut bob).await;

    drop(bob);
    server.wait_for_connections(1).await;

    let connections = &server.app.state.realtime.connections;
    assert!(!connections.is_user_connected(&UserId::new("bob")));
    assert!(connections.is_user_connected(&UserId::new("alice")));

    drop(alice);
    server.wait_for_connections(0).await;
    assert_eq!(server.app.state.realtime.channels.channel_count(), 0);
    server.stop().await;
}

#[tokio::test]
async fn test_sent_message_history_reflects_read_status() {
    let server = TestServer::spawn().await;
    let mut alice = server.connect("alice").await;
    let mut bob = server.connect("bob").await;

    send_json(
        &mut alice,
        json!({"event": "message", "data": {"content": "pic.png", "toUserId": "bob", "type": "image"}}),
    )
    .await;
    let delivered = next_json(&mut bob).await;
    next_json(&mut alice).await;
    let id = delivered["data"]["id"].clone();
    assert_eq!(delivered["data"]["type"], "image");

    send_json(&mut bob, json!({"event": "read", "data": {"messageIds": [id, id]}})).await;
    for _ in 0..2 {
        let read = next_json(&mut alice).await;
        assert_eq!(read["event"], "read");
        assert_eq!(read["data"]["messageId"], id);
    }

    let token = server.app.token("alice", UserRole::User);
    let response = server
        .app
        .request("GET", "/api/messages?withUserId=bob", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let history = response.body.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["id"], id);
    assert_eq!(history[0]["content"], "pic.png");
    assert_eq!(history[0]["type"], "image");
    assert_eq!(history[0]["status"], "read");
    assert_eq!(history[0]["readBy"], json!(["bob"]));
    server.stop().await;
}

#[tokio::test]
async fn test_silent_connection_times_out() {
    let mut config = AppConfig::default();
    config.realtime.ping_interval_seconds = 1;
    config.realtime.ping_timeout_seconds = 1;
    let server = TestServer::spawn_with(config).await;
    let mut alice = server.connect("alice").await;

    send_json(&mut alice, json!({"event": "join", "data": "r1"})).await;
    next_json(&mut alice).await;
    assert!(server.app.state.realtime.channels.channel_count() > 0);

    // The client stops reading, so pings go unanswered.
    server.wait_for_connections(0).await;
    assert_eq!(server.app.state.realtime.channels.channel_count(), 0);
    assert!(
        !server
            .app
            .state
            .realtime
            .connections
            .is_user_connected(&UserId::new("alice"))
    );
    drop(alice);
    server.stop().await;
}
