//! In-memory collections and the in-memory store
//!
//! [`CollectionSet`] is the shared in-memory state of both backends: the file
//! backend replays its logs into one on open.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde_json::Value;

use super::document::{document_id, new_document_id, render_document, stamp_new, Document, ID_FIELD};
use super::errors::{StorageError, StorageResult};
use super::filter::Filter;
use super::store::{validate_collection_name, DocumentStore};

#[derive(Debug, Default)]
struct Collection {
    /// Insertion order
    documents: Vec<Document>,
    /// id -> index into `documents`
    positions: HashMap<String, usize>,
}

/// Named collections of documents keyed by `_id`
#[derive(Debug, Default)]
pub(crate) struct CollectionSet {
    collections: BTreeMap<String, Collection>,
}

impl CollectionSet {
    /// Stores a document that already carries `_id`.
    ///
    /// A document with a known id replaces the old one in place, keeping its
    /// position in insertion order.
    pub(crate) fn put(&mut self, collection: &str, document: Document) -> StorageResult<()> {
        let id = document_id(&document)
            .ok_or_else(|| StorageError::invalid_request("Document has no string _id"))?
            .to_string();

        let entry = self.collections.entry(collection.to_string()).or_default();
        match entry.positions.get(&id) {
            Some(&index) => entry.documents[index] = document,
            None => {
                entry.positions.insert(id, entry.documents.len());
                entry.documents.push(document);
            }
        }
        Ok(())
    }

    pub(crate) fn get(&self, collection: &str, id: &str) -> Option<&Document> {
        let entry = self.collections.get(collection)?;
        entry.positions.get(id).map(|&index| &entry.documents[index])
    }

    pub(crate) fn find(&self, collection: &str, filter: &Filter, limit: usize) -> Vec<Value> {
        let Some(entry) = self.collections.get(collection) else {
            return Vec::new();
        };
        let limit = if limit == 0 { usize::MAX } else { limit };

        entry
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .take(limit)
            .map(render_document)
            .collect()
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }
}

/// Builds the updated version of a stored document
pub(crate) fn apply_fields(existing: &Document, fields: Document) -> StorageResult<Document> {
    if fields.contains_key(ID_FIELD) {
        return Err(StorageError::invalid_request("_id cannot be updated"));
    }
    let mut updated = existing.clone();
    updated.extend(fields);
    Ok(updated)
}

/// Process-local document store
#[derive(Debug)]
pub struct MemoryStore {
    database_name: String,
    state: RwLock<CollectionSet>,
}

impl MemoryStore {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            state: RwLock::new(CollectionSet::default()),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn insert(&self, collection: &str, document: Document) -> StorageResult<String> {
        validate_collection_name(collection)?;
        let id = new_document_id();
        let document = stamp_new(document, &id);

        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;
        state.put(collection, document)?;
        Ok(id)
    }

    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Value>> {
        validate_collection_name(collection)?;
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;
        Ok(state.find(collection, filter, limit))
    }

    fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StorageResult<bool> {
        validate_collection_name(collection)?;
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;

        let updated = match state.get(collection, id) {
            Some(existing) => apply_fields(existing, fields)?,
            None => return Ok(false),
        };
        state.put(collection, updated)?;
        Ok(true)
    }

    fn collection_names(&self) -> StorageResult<Vec<String>> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;
        Ok(state.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_insert_and_find() {
        let store = MemoryStore::new("maso");
        let id = store.insert("order", doc(json!({"customer": "Acme"}))).unwrap();

        let found = store.find("order", &Filter::new(), 50).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], id);
        assert_eq!(found[0]["customer"], "Acme");
        assert!(found[0].get("_id").is_none());
    }

    #[test]
    fn test_find_unknown_collection_is_empty() {
        let store = MemoryStore::new("maso");
        assert!(store.find("task", &Filter::new(), 100).unwrap().is_empty());
    }

    #[test]
    fn test_find_respects_filter_limit_and_order() {
        let store = MemoryStore::new("maso");
        for i in 0..5 {
            let order_id = if i % 2 == 0 { "o1" } else { "o2" };
            store.insert("task", doc(json!({"order_id": order_id, "seq": i}))).unwrap();
        }

        let o1 = store.find("task", &Filter::new().eq("order_id", "o1"), 100).unwrap();
        let seqs: Vec<_> = o1.iter().map(|d| d["seq"].as_i64().unwrap()).collect();
        assert_eq!(seqs, vec![0, 2, 4]);

        assert_eq!(store.find("task", &Filter::new(), 2).unwrap().len(), 2);
        assert_eq!(store.find("task", &Filter::new(), 0).unwrap().len(), 5);
    }

    #[test]
    fn test_update_fields() {
        let store = MemoryStore::new("maso");
        let id = store.insert("task", doc(json!({"name": "Weld", "status": "queued"}))).unwrap();

        let matched = store.update_fields("task", &id, doc(json!({"status": "paused"}))).unwrap();
        assert!(matched);

        let found = store.find("task", &Filter::new(), 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["status"], "paused");
        assert_eq!(found[0]["name"], "Weld");
    }

    #[test]
    fn test_update_unknown_id_creates_nothing() {
        let store = MemoryStore::new("maso");
        let matched = store
            .update_fields("task", &new_document_id(), doc(json!({"status": "done"})))
            .unwrap();
        assert!(!matched);
        assert!(store.collection_names().unwrap().is_empty());
    }

    #[test]
    fn test_update_cannot_change_id() {
        let store = MemoryStore::new("maso");
        let id = store.insert("task", doc(json!({"name": "Cut"}))).unwrap();
        let err = store.update_fields("task", &id, doc(json!({"_id": "other"}))).unwrap_err();
        assert!(err.message().contains("_id"));
    }

    #[test]
    fn test_collection_names_sorted() {
        let store = MemoryStore::new("maso");
        store.insert("task", Document::new()).unwrap();
        store.insert("attachment", Document::new()).unwrap();
        assert_eq!(store.collection_names().unwrap(), vec!["attachment", "task"]);
    }
}
