//! Document storage
//!
//! Documents are JSON objects grouped into named collections. Every document
//! gets a generated identifier under `_id` at insert time; query results
//! expose it as the string `id` instead.
//!
//! Two backends implement [`DocumentStore`]:
//!
//! - [`MemoryStore`]: process-local, lost on exit
//! - [`FileStore`]: one append-only, checksummed log per collection,
//!   replayed on open; latest record for an id wins
//!
//! Handlers never hold a store directly. They receive a [`StorageHandle`],
//! which is either ready or explicitly unavailable.

mod checksum;
mod document;
mod errors;
mod file;
mod filter;
mod handle;
mod memory;
mod reader;
mod record;
mod store;
mod writer;

pub use checksum::compute_checksum;
pub use document::{new_document_id, parse_document_id, render_document, timestamp_now, Document};
pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use file::FileStore;
pub use filter::Filter;
pub use handle::{StorageHandle, StorageLocation};
pub use memory::MemoryStore;
pub use reader::LogReader;
pub use record::LogRecord;
pub use store::DocumentStore;
pub use writer::LogWriter;
