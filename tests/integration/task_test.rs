//! Integration tests for the task board REST API.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use teamcollab_entity::user::UserRole;

#[tokio::test]
async fn test_tasks_require_auth() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/tasks", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let response = app
        .request("GET", "/api/tasks", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_update_list_task() {
    let app = helpers::TestApp::new();
    let token = app.token("alice", UserRole::User);

    let created = app
        .request(
            "POST",
            "/api/tasks",
            Some(json!({"title": "Write docs", "priority": "high"})),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "Write docs");
    assert_eq!(created.body["status"], "todo");
    assert_eq!(created.body["createdBy"], "alice");
    let id = created.body["id"].as_str().unwrap().to_string();

    let updated = app
        .request(
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(json!({"status": "in-progress"})),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["status"], "in-progress");
    assert_eq!(updated.body["title"], "Write docs");

    let listed = app.request("GET", "/api/tasks", None, Some(&token)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_task_without_title_is_rejected() {
    let app = helpers::TestApp::new();
    let token = app.token("alice", UserRole::User);

    let response = app
        .request("POST", "/api/tasks", Some(json!({"title": ""})), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_update_missing_task_is_404() {
    let app = helpers::TestApp::new();
    let token = app.token("alice", UserRole::User);

    let response = app
        .request(
            "PUT",
            "/api/tasks/missing",
            Some(json!({"title": "x"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_only_creator_or_admin_may_delete() {
    let app = helpers::TestApp::new();
    let alice = app.token("alice", UserRole::User);
    let bob = app.token("bob", UserRole::User);
    let admin = app.token("root", UserRole::Admin);

    let created = app
        .request("POST", "/api/tasks", Some(json!({"title": "a"})), Some(&alice))
        .await;
    let first = created.body["id"].as_str().unwrap().to_string();
    let created = app
        .request("POST", "/api/tasks", Some(json!({"title": "b"})), Some(&alice))
        .await;
    let second = created.body["id"].as_str().unwrap().to_string();

    let response = app
        .request("DELETE", &format!("/api/tasks/{first}"), None, Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("DELETE", &format!("/api/tasks/{first}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["ok"], true);

    let response = app
        .request("DELETE", &format!("/api/tasks/{second}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("DELETE", &format!("/api/tasks/{second}"), None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
