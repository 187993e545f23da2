//! Shared handler state
//!
//! Handlers receive the storage handle through axum state. Store calls are
//! synchronous (the file backend fsyncs), so they run on the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::config::ServerConfig;
use super::errors::{ApiError, ApiResult};
use crate::schema::Record;
use crate::storage::{Document, DocumentStore, Filter, StorageHandle, StorageResult};

/// State shared by every route
#[derive(Debug, Clone)]
pub struct AppState {
    pub storage: StorageHandle,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, storage: StorageHandle) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Fails with `StorageUnavailable` unless a backend is open
    pub fn require_storage(&self) -> ApiResult<()> {
        self.storage.store().map(|_| ()).map_err(ApiError::from)
    }

    /// Runs a store operation on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentStore) -> StorageResult<T> + Send + 'static,
    {
        let storage = self.storage.clone();
        let result = tokio::task::spawn_blocking(move || {
            let store = storage.store()?;
            op(store)
        })
        .await
        .map_err(|e| ApiError::Storage(format!("Storage task failed: {}", e)))?;
        Ok(result?)
    }

    /// Inserts a validated record into its collection
    pub async fn insert_record<R: Record>(&self, record: &R) -> ApiResult<String> {
        let document = to_document(record)?;
        self.with_store(move |store| store.insert(R::KIND, document)).await
    }

    /// Lists documents of a collection in insertion order
    pub async fn find_records(&self, collection: &'static str, filter: Filter, limit: usize) -> ApiResult<Vec<Value>> {
        self.with_store(move |store| store.find(collection, &filter, limit)).await
    }
}

/// Response of every create endpoint except invoices
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Unwraps the JSON body and validates it as `R`.
pub fn decode_body<R: Record>(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<R> {
    let Json(payload) = payload?;
    Ok(R::from_payload(payload)?)
}

/// Treats `?field=` like an absent filter
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn to_document<T: Serialize>(record: &T) -> ApiResult<Document> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(ApiError::Storage(format!(
            "Record serialized to {} instead of an object",
            crate::schema::json_type_name(&other)
        ))),
        Err(e) => Err(ApiError::Storage(format!("Record is not serializable: {}", e))),
    }
}
