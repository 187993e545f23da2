//! Storage backend trait

use serde_json::Value;

use super::document::Document;
use super::errors::{StorageError, StorageResult};
use super::filter::Filter;

/// A document store holding named collections.
///
/// Implementations guarantee single-document atomicity: a concurrent reader
/// sees a document either before or after a write, never in between.
pub trait DocumentStore: Send + Sync {
    /// Database name the store was opened with
    fn database_name(&self) -> &str;

    /// Persists one document and returns its newly generated identifier.
    ///
    /// The store assigns `_id`, `created_at` and `updated_at`; any `id` or
    /// `_id` already present in the document is replaced.
    fn insert(&self, collection: &str, document: Document) -> StorageResult<String>;

    /// Returns up to `limit` documents matching `filter`, in insertion order.
    ///
    /// `limit == 0` means no limit. Documents are rendered with `id` in
    /// place of `_id`.
    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Value>>;

    /// Sets top-level fields on the document with the given identifier.
    ///
    /// Returns `false` when no document matched. Never creates a document.
    fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StorageResult<bool>;

    /// Names of existing collections, sorted
    fn collection_names(&self) -> StorageResult<Vec<String>>;
}

/// Collection names become file names in the file backend
pub fn validate_collection_name(name: &str) -> StorageResult<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::invalid_request(format!("Invalid collection name: {:?}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert!(validate_collection_name("task").is_ok());
        assert!(validate_collection_name("work_order-2").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("../etc").is_err());
        assert!(validate_collection_name("a b").is_err());
    }
}
