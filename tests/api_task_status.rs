//! Task status updates and storage-unavailable behavior

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{create, get, memory_app, patch, post, unavailable_app};

#[tokio::test]
async fn test_pause_queued_task() {
    let app = memory_app();
    let id = create(
        &app,
        "/api/tasks",
        json!({"order_id": "o1", "name": "Laser cut", "assignee": "mika", "estimated_minutes": 45}),
    )
    .await;

    let (_, before) = get(&app, "/api/tasks").await;
    assert_eq!(before[0]["status"], "queued");

    let (status, body) = patch(&app, &format!("/api/tasks/{}/status", id), json!({"status": "paused"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let (_, after) = get(&app, "/api/tasks").await;
    let tasks = after.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task["status"], "paused");
    assert_eq!(task["id"], id);
    assert_eq!(task["name"], "Laser cut");
    assert_eq!(task["assignee"], "mika");
    assert_eq!(task["estimated_minutes"], 45);
    assert_eq!(task["created_at"], before[0]["created_at"]);
}

#[tokio::test]
async fn test_update_sets_notes_only_when_given() {
    let app = memory_app();
    let id = create(&app, "/api/tasks", json!({"order_id": "o1", "name": "Weld", "notes": "initial"})).await;
    let uri = format!("/api/tasks/{}/status", id);

    patch(&app, &uri, json!({"status": "in_progress", "notes": ""})).await;
    let (_, tasks) = get(&app, "/api/tasks").await;
    assert_eq!(tasks[0]["notes"], "initial");

    patch(&app, &uri, json!({"status": "done", "notes": "passed inspection"})).await;
    let (_, tasks) = get(&app, "/api/tasks?status=done").await;
    assert_eq!(tasks[0]["notes"], "passed inspection");
}

#[tokio::test]
async fn test_any_status_may_follow_any_other() {
    let app = memory_app();
    let id = create(&app, "/api/tasks", json!({"order_id": "o1", "name": "Bend", "status": "done"})).await;

    let (status, _) = patch(&app, &format!("/api/tasks/{}/status", id), json!({"status": "queued"})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let app = memory_app();
    let (status, body) = patch(
        &app,
        "/api/tasks/7f1c2a9e-4b3d-4e8a-9c6f-0d2b5e8a1f34/status",
        json!({"status": "done"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");

    let (_, tasks) = get(&app, "/api/tasks").await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn test_malformed_task_id() {
    let app = memory_app();
    let (status, body) = patch(&app, "/api/tasks/not-an-id/status", json!({"status": "done"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID format");

    let (_, tasks) = get(&app, "/api/tasks").await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn test_task_id_with_surrounding_whitespace_is_malformed() {
    let app = memory_app();
    let id = create(&app, "/api/tasks", json!({"order_id": "o1", "name": "Cut"})).await;

    let uri = format!("/api/tasks/%20{}/status", id);
    let (status, body) = patch(&app, &uri, json!({"status": "done"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid ID format");

    let (_, tasks) = get(&app, "/api/tasks").await;
    assert_eq!(tasks[0]["status"], "queued");
}

#[tokio::test]
async fn test_invalid_status_value() {
    let app = memory_app();
    let id = create(&app, "/api/tasks", json!({"order_id": "o1", "name": "Cut"})).await;

    let (status, body) = patch(&app, &format!("/api/tasks/{}/status", id), json!({"status": "finished"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "status");

    let (_, tasks) = get(&app, "/api/tasks").await;
    assert_eq!(tasks[0]["status"], "queued");
}

// =============================================================================
// Storage unavailable
// =============================================================================

#[tokio::test]
async fn test_unavailable_storage_fails_explicitly() {
    let app = unavailable_app();

    let (status, body) = get(&app, "/api/orders").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database not available");

    let (status, _) = post(&app, "/api/tasks", json!({"order_id": "o1", "name": "Cut"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = get(&app, "/api/invoices?order_id=o1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unavailable_checked_before_id_format() {
    let app = unavailable_app();
    let (status, body) = patch(&app, "/api/tasks/not-an-id/status", json!({"status": "done"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Database not available");
}

#[tokio::test]
async fn test_validation_precedes_storage_check() {
    let app = unavailable_app();
    let (status, _) = post(&app, "/api/orders", json!({"notes": "no customer"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
