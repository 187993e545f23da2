//! Liveness and diagnostic routes
//!
//! `/test` never fails: each sub-check degrades to a descriptive string.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::config::ServerConfig;
use super::state::AppState;
use crate::storage::StorageHandle;

const MAX_COLLECTIONS: usize = 10;
const MAX_ERROR_CHARS: usize = 50;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Storage and configuration report served at `/test`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Builds the diagnostic report. Blocks on the store.
pub fn diagnose(storage: &StorageHandle, config: &ServerConfig) -> DiagnosticReport {
    let mut report = DiagnosticReport::new(config);
    match storage.store() {
        Ok(store) => {
            report.database = "✅ Available".to_string();
            report.connection_status = "Connected".to_string();
            match store.collection_names() {
                Ok(mut names) => {
                    names.truncate(MAX_COLLECTIONS);
                    report.collections = names;
                    report.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string()));
                }
            }
        }
        Err(_) => report.database = "⚠️  Available but not initialized".to_string(),
    }

    report
}

impl DiagnosticReport {
    fn new(config: &ServerConfig) -> Self {
        Self {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: set_flag(config.database_url_set()),
            database_name: set_flag(config.database_name_set()),
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}

fn set_flag(set: bool) -> String {
    let flag = if set { "✅ Set" } else { "❌ Not Set" };
    flag.to_string()
}

/// Create liveness and diagnostic routes
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/test", get(diagnostic_handler))
        .with_state(state)
}

async fn root_handler() -> impl IntoResponse {
    let response = RootResponse {
        message: "Maso Project Backend Running".to_string(),
    };
    (StatusCode::OK, Json(response))
}

async fn diagnostic_handler(State(state): State<AppState>) -> impl IntoResponse {
    let storage = state.storage.clone();
    let config = state.config.clone();
    let report = match tokio::task::spawn_blocking(move || diagnose(&storage, &config)).await {
        Ok(report) => report,
        Err(e) => {
            let mut report = DiagnosticReport::new(&state.config);
            report.database = format!("❌ Error: {}", truncate(&e.to_string()));
            report
        }
    };
    (StatusCode::OK, Json(report))
}
