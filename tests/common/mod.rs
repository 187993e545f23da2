//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use maso::http_server::{HttpServer, ServerConfig};
use maso::storage::{MemoryStore, StorageHandle};

pub fn memory_config() -> ServerConfig {
    ServerConfig::default().with_database(Some("memory://".into()), Some("maso".into()))
}

/// Router over a fresh in-memory store
pub fn memory_app() -> Router {
    HttpServer::new(memory_config(), StorageHandle::ready(MemoryStore::new("maso"))).router()
}

/// Router whose storage was never configured
pub fn unavailable_app() -> Router {
    HttpServer::new(ServerConfig::default(), StorageHandle::unavailable("not configured")).router()
}

/// Sends one request and returns the status and the JSON body (`Null` if empty).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PATCH", uri, Some(body)).await
}

/// Creates a record and returns its id
pub async fn create(app: &Router, uri: &str, body: Value) -> String {
    let (status, response) = post(app, uri, body).await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", response);
    response["id"].as_str().unwrap().to_string()
}
