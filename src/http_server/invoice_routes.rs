//! Invoice endpoints
//!
//! Subtotal and total are always computed from the items; values sent by the
//! client are overwritten before the invoice is stored.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiResult;
use super::state::{decode_body, non_empty, AppState};
use crate::schema::{Invoice, Record};
use crate::storage::Filter;

const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceCreatedResponse {
    pub id: String,
    pub subtotal: f64,
    pub total: f64,
}

/// Create invoice routes
pub fn invoice_routes(state: AppState) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .with_state(state)
}

async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<InvoiceCreatedResponse>> {
    let invoice: Invoice = decode_body(payload)?;
    let invoice = invoice.with_computed_totals()?;
    let id = state.insert_record(&invoice).await?;
    Ok(Json(InvoiceCreatedResponse {
        id,
        subtotal: invoice.subtotal,
        total: invoice.total,
    }))
}

async fn list_invoices(
    State(state): State<AppState>,
    query: Result<Query<InvoiceListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let filter = Filter::new().eq_opt("order_id", non_empty(query.order_id));
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let docs = state.find_records(Invoice::KIND, filter, limit).await?;
    Ok(Json(docs))
}
