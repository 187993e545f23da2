//! Attachment endpoints
//!
//! Attachments carry metadata and an optional URL only; no file content is
//! accepted or stored.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::errors::ApiResult;
use super::state::{decode_body, non_empty, AppState, CreatedResponse};
use crate::schema::{Attachment, Record};
use crate::storage::Filter;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct AttachmentListQuery {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Create attachment routes
pub fn attachment_routes(state: AppState) -> Router {
    Router::new()
        .route("/attachments", get(list_attachments).post(create_attachment))
        .with_state(state)
}

async fn create_attachment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let attachment: Attachment = decode_body(payload)?;
    let id = state.insert_record(&attachment).await?;
    Ok(Json(CreatedResponse { id }))
}

async fn list_attachments(
    State(state): State<AppState>,
    query: Result<Query<AttachmentListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let filter = Filter::new().eq_opt("order_id", non_empty(query.order_id));
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let docs = state.find_records(Attachment::KIND, filter, limit).await?;
    Ok(Json(docs))
}
