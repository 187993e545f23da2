//! Storage handle shared by request handlers
//!
//! The handle is built once at startup from the connection string and the
//! database name. A missing setting or a backend that fails to open yields an
//! unavailable handle: the server still starts, and every storage operation
//! fails with `MASO_STORAGE_UNAVAILABLE` instead of returning empty results.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::errors::{StorageError, StorageResult};
use super::file::FileStore;
use super::memory::MemoryStore;
use super::store::DocumentStore;

/// Where documents live, parsed from the connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// `memory://`
    Memory,
    /// `file://<dir>` or a bare directory path
    File(PathBuf),
}

impl StorageLocation {
    /// Parses a connection string.
    ///
    /// # Errors
    ///
    /// `MASO_STORAGE_INVALID_REQUEST` for empty strings and unsupported schemes.
    pub fn parse(url: &str) -> StorageResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StorageError::invalid_request("Empty connection string"));
        }

        match url.split_once("://") {
            Some(("memory", _)) => Ok(StorageLocation::Memory),
            Some(("file", path)) if !path.is_empty() => Ok(StorageLocation::File(PathBuf::from(path))),
            Some(("file", _)) => Err(StorageError::invalid_request("file:// connection string has no path")),
            Some((scheme, _)) => Err(StorageError::invalid_request(format!(
                "Unsupported connection scheme: {}",
                scheme
            ))),
            None => Ok(StorageLocation::File(PathBuf::from(url))),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Memory => write!(f, "memory://"),
            StorageLocation::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

/// Storage as seen by request handlers
#[derive(Clone)]
pub enum StorageHandle {
    Ready(Arc<dyn DocumentStore>),
    /// Why storage cannot be used
    Unavailable(String),
}

impl StorageHandle {
    pub fn ready(store: impl DocumentStore + 'static) -> Self {
        StorageHandle::Ready(Arc::new(store))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        StorageHandle::Unavailable(reason.into())
    }

    /// Opens the backend named by the connection string.
    ///
    /// Never fails: problems are captured as an unavailable handle.
    pub fn connect(database_url: Option<&str>, database_name: Option<&str>) -> Self {
        let (Some(url), Some(name)) = (database_url, database_name) else {
            return Self::unavailable("DATABASE_URL and DATABASE_NAME must both be set");
        };
        match Self::try_connect(url, name) {
            Ok(handle) => handle,
            Err(e) => Self::unavailable(e.to_string()),
        }
    }

    fn try_connect(url: &str, name: &str) -> StorageResult<Self> {
        match StorageLocation::parse(url)? {
            StorageLocation::Memory => Ok(Self::ready(MemoryStore::new(name))),
            StorageLocation::File(root) => Ok(Self::ready(FileStore::open(&root, name)?)),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StorageHandle::Ready(_))
    }

    /// Returns the store, or `MASO_STORAGE_UNAVAILABLE`.
    pub fn store(&self) -> StorageResult<&dyn DocumentStore> {
        match self {
            StorageHandle::Ready(store) => Ok(store.as_ref()),
            StorageHandle::Unavailable(_) => Err(StorageError::unavailable("Database not available")),
        }
    }

    /// Why the handle is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self {
            StorageHandle::Ready(_) => None,
            StorageHandle::Unavailable(reason) => Some(reason),
        }
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageHandle::Ready(store) => f.debug_tuple("Ready").field(&store.database_name()).finish(),
            StorageHandle::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}
