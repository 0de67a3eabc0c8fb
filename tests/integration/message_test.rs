//! Integration tests for identity, rooms, history and health endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use teamcollab_core::types::{RoomId, UserId};
use teamcollab_entity::message::{MessageKind, MessageTarget, NewMessage};
use teamcollab_entity::user::UserRole;
use teamcollab_store::MessageStore;

async fn seed(app: &helpers::TestApp, from: &str, target: MessageTarget, content: &str) {
    app.state
        .messages
        .create(NewMessage {
            sender: UserId::new(from),
            target,
            content: content.to_string(),
            kind: MessageKind::Text,
        })
        .await
        .expect("Failed to seed message");
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");

    let response = app.request("GET", "/api/health/detailed", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["ws_connections"], 0);
}

#[tokio::test]
async fn test_me_and_admin() {
    let app = helpers::TestApp::new();
    let user = app.token("alice", UserRole::User);
    let admin = app.token("root", UserRole::Admin);

    let response = app.request("GET", "/api/me", None, Some(&user)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["id"], "alice");
    assert_eq!(response.body["user"]["role"], "user");
    assert_eq!(response.body["user"]["email"], "alice@test.com");

    let response = app.request("GET", "/api/admin", None, Some(&user)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("GET", "/api/admin", None, Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Welcome, admin!");
}

#[tokio::test]
async fn test_rooms_listed_for_members_only() {
    let app = helpers::TestApp::new();
    let alice = app.token("alice", UserRole::User);
    let bob = app.token("bob", UserRole::User);
    let carol = app.token("carol", UserRole::User);

    let created = app
        .request(
            "POST",
            "/api/rooms",
            Some(json!({"name": "design", "memberIds": ["bob"]})),
            Some(&alice),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["members"], json!(["alice", "bob"]));

    let listed = app.request("GET", "/api/rooms", None, Some(&bob)).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["name"], "design");

    let listed = app.request("GET", "/api/rooms", None, Some(&carol)).await;
    assert!(listed.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_direct_history_with_peer() {
    let app = helpers::TestApp::new();
    let alice = app.token("alice", UserRole::User);

    seed(&app, "alice", MessageTarget::Direct(UserId::new("bob")), "one").await;
    seed(&app, "bob", MessageTarget::Direct(UserId::new("alice")), "two").await;
    seed(&app, "carol", MessageTarget::Direct(UserId::new("alice")), "other").await;
    seed(&app, "alice", MessageTarget::Direct(UserId::new("bob")), "three").await;

    let response = app
        .request("GET", "/api/messages?withUserId=bob", None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let contents: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["one", "two", "three"]);

    let response = app
        .request("GET", "/api/messages?withUserId=bob&limit=2", None, Some(&alice))
        .await;
    let contents: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["two", "three"]);
}

#[tokio::test]
async fn test_room_history() {
    let app = helpers::TestApp::new();
    let alice = app.token("alice", UserRole::User);

    seed(&app, "bob", MessageTarget::Room(RoomId::new("r1")), "in room").await;
    seed(&app, "bob", MessageTarget::Direct(UserId::new("alice")), "direct").await;

    let response = app
        .request("GET", "/api/messages?roomId=r1", None, Some(&alice))
        .await;
    let messages = response.body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["roomId"], "r1");
    assert_eq!(messages[0]["type"], "text");
    assert_eq!(messages[0]["status"], "sent");
}
