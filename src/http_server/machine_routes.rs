//! Machine endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::errors::ApiResult;
use super::state::{decode_body, non_empty, AppState, CreatedResponse};
use crate::schema::{Machine, Record};
use crate::storage::Filter;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct MachineListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Create machine routes
pub fn machine_routes(state: AppState) -> Router {
    Router::new()
        .route("/machines", get(list_machines).post(create_machine))
        .with_state(state)
}

async fn create_machine(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let machine: Machine = decode_body(payload)?;
    let id = state.insert_record(&machine).await?;
    Ok(Json(CreatedResponse { id }))
}

async fn list_machines(
    State(state): State<AppState>,
    query: Result<Query<MachineListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let filter = Filter::new().eq_opt("status", non_empty(query.status));
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let docs = state.find_records(Machine::KIND, filter, limit).await?;
    Ok(Json(docs))
}
