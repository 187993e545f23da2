//! File-backed document store
//!
//! Layout: `<root>/<database>/<collection>.dat`, one append-only log per
//! collection. On open every log is replayed into memory; the latest record
//! for an id wins. Updates append the full new version of the document.
//!
//! Disk is written (and fsynced) before memory is updated. A failed append
//! cuts the log back to its previous length and memory is left unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;

use super::document::{new_document_id, stamp_new, Document};
use super::errors::{StorageError, StorageResult};
use super::filter::Filter;
use super::memory::{apply_fields, CollectionSet};
use super::reader::LogReader;
use super::record::LogRecord;
use super::store::{validate_collection_name, DocumentStore};
use super::writer::LogWriter;

const LOG_EXTENSION: &str = "dat";

struct FileState {
    collections: CollectionSet,
    writers: HashMap<String, LogWriter>,
}

/// Document store persisted as checksummed collection logs
pub struct FileStore {
    database_name: String,
    dir: PathBuf,
    state: RwLock<FileState>,
}

impl FileStore {
    /// Opens (creating if needed) the database directory under `root` and
    /// replays every collection log found there.
    ///
    /// # Errors
    ///
    /// `MASO_DATA_CORRUPTION` if any log fails checksum or framing checks,
    /// or holds a record that is not a JSON object.
    pub fn open(root: &Path, database_name: &str) -> StorageResult<Self> {
        validate_collection_name(database_name)
            .map_err(|_| StorageError::invalid_request(format!("Invalid database name: {:?}", database_name)))?;

        let dir = root.join(database_name);
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::write_failed(format!("Failed to create database directory: {}", dir.display()), e)
        })?;

        let mut collections = CollectionSet::default();
        let entries = fs::read_dir(&dir).map_err(|e| {
            StorageError::read_failed(format!("Failed to list database directory: {}", dir.display()), e)
        })?;
        for entry in entries {
            let path = entry
                .map_err(|e| StorageError::read_failed("Failed to read directory entry", e))?
                .path();
            let Some(collection) = collection_of(&path) else {
                continue;
            };
            Self::replay(&path, &collection, &mut collections)?;
        }

        Ok(Self {
            database_name: database_name.to_string(),
            dir,
            state: RwLock::new(FileState {
                collections,
                writers: HashMap::new(),
            }),
        })
    }

    fn replay(path: &Path, collection: &str, collections: &mut CollectionSet) -> StorageResult<()> {
        let mut reader = LogReader::open(path)?;
        while let Some(record) = reader.read_next()? {
            let document: Document = serde_json::from_slice(&record.body).map_err(|e| {
                StorageError::data_corruption(format!(
                    "Record {} in {} is not a JSON object: {}",
                    record.document_id,
                    path.display(),
                    e
                ))
            })?;
            collections.put(collection, document)?;
        }
        Ok(())
    }

    /// Directory holding this database's collection logs
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn log_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", collection, LOG_EXTENSION))
    }

    /// Appends the full document to its collection log, opening the log on first use.
    fn persist(&self, state: &mut FileState, collection: &str, id: &str, document: &Document) -> StorageResult<()> {
        let body = serde_json::to_vec(document)
            .map_err(|e| StorageError::invalid_request(format!("Document is not serializable: {}", e)))?;

        if !state.writers.contains_key(collection) {
            let writer = LogWriter::open(&self.log_path(collection))?;
            state.writers.insert(collection.to_string(), writer);
        }
        let writer = state
            .writers
            .get_mut(collection)
            .ok_or_else(|| StorageError::internal("Collection log writer missing"))?;
        writer.append(&LogRecord::new(id, body))?;
        Ok(())
    }
}

/// `<collection>.dat` -> collection name; anything else is ignored
fn collection_of(path: &Path) -> Option<String> {
    if !path.is_file() || path.extension()?.to_str()? != LOG_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    validate_collection_name(stem).ok()?;
    Some(stem.to_string())
}

impl DocumentStore for FileStore {
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
        self.persist(&mut state, collection, &id, &document)?;
        state.collections.put(collection, document)?;
        Ok(id)
    }

    fn find(&self, collection: &str, filter: &Filter, limit: usize) -> StorageResult<Vec<Value>> {
        validate_collection_name(collection)?;
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;
        Ok(state.collections.find(collection, filter, limit))
    }

    fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StorageResult<bool> {
        validate_collection_name(collection)?;
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;

        let updated = match state.collections.get(collection, id) {
            Some(existing) => apply_fields(existing, fields)?,
            None => return Ok(false),
        };
        self.persist(&mut state, collection, id, &updated)?;
        state.collections.put(collection, updated)?;
        Ok(true)
    }

    fn collection_names(&self) -> StorageResult<Vec<String>> {
        let state = self
            .state
            .read()
            .map_err(|_| StorageError::internal("Lock poisoned"))?;
        Ok(state.collections.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_open_creates_database_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), "maso").unwrap();
        assert!(store.dir().is_dir());
        assert!(store.collection_names().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_database_name() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FileStore::open(temp_dir.path(), "../escape").is_err());
    }

    #[test]
    fn test_insert_writes_collection_log() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path(), "maso").unwrap();
        store.insert("order", doc(json!({"customer": "Acme"}))).unwrap();

        assert!(temp_dir.path().join("maso").join("order.dat").is_file());
    }

    #[test]
    fn test_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("maso");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("README.txt"), "not a log").unwrap();

        let store = FileStore::open(temp_dir.path(), "maso").unwrap();
        assert!(store.collection_names().unwrap().is_empty());
    }
}
