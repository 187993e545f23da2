//! Order endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::errors::ApiResult;
use super::state::{decode_body, AppState, CreatedResponse};
use crate::schema::{Order, Record};
use crate::storage::Filter;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Create order routes
pub fn order_routes(state: AppState) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .with_state(state)
}

async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let order: Order = decode_body(payload)?;
    let id = state.insert_record(&order).await?;
    Ok(Json(CreatedResponse { id }))
}

async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let docs = state.find_records(Order::KIND, Filter::new(), limit).await?;
    Ok(Json(docs))
}
