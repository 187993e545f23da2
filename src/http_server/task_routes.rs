//! Task endpoints
//!
//! Tasks are the only records changed after creation: their status and notes
//! can be updated in place. Any status may follow any other.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::state::{decode_body, non_empty, AppState, CreatedResponse};
use crate::schema::{Record, StatusUpdate, Task};
use crate::storage::{parse_document_id, timestamp_now, Document, Filter};

const DEFAULT_LIMIT: usize = 100;

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub ok: bool,
}

// ==================
// Routes
// ==================

/// Create task routes
pub fn task_routes(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:task_id/status", patch(update_task_status))
        .with_state(state)
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let task: Task = decode_body(payload)?;
    let id = state.insert_record(&task).await?;
    Ok(Json(CreatedResponse { id }))
}

async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let filter = Filter::new()
        .eq_opt("order_id", non_empty(query.order_id))
        .eq_opt("status", non_empty(query.status));
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let docs = state.find_records(Task::KIND, filter, limit).await?;
    Ok(Json(docs))
}

async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<UpdateResponse>> {
    let update: StatusUpdate = decode_body(payload)?;
    state.require_storage()?;
    let id = parse_document_id(&task_id).ok_or(ApiError::InvalidId)?;

    let fields = status_fields(&update);
    let matched = state
        .with_store(move |store| store.update_fields(Task::KIND, &id, fields))
        .await?;
    if !matched {
        return Err(ApiError::NotFound("Task"));
    }
    Ok(Json(UpdateResponse { ok: true }))
}

/// Fields written by a status update. Empty notes leave the stored notes alone.
fn status_fields(update: &StatusUpdate) -> Document {
    let mut fields = Document::new();
    fields.insert("status".to_string(), Value::from(update.status.as_str()));
    fields.insert("updated_at".to_string(), Value::from(timestamp_now()));
    if let Some(notes) = update.notes.as_deref().filter(|n| !n.is_empty()) {
        fields.insert("notes".to_string(), Value::from(notes));
    }
    fields
}
