//! Append-only collection log writer
//!
//! Records are never rewritten in place. Each append is followed by fsync and
//! a write is only acknowledged once both succeed.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::LogRecord;

/// Appender for one collection log
pub struct LogWriter {
    path: PathBuf,
    file: File,
    current_offset: u64,
}

impl LogWriter {
    /// Opens or creates the log at `path`, creating parent directories.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::write_failed(format!("Failed to create directory: {}", parent.display()), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                StorageError::write_failed(format!("Failed to open collection log: {}", path.display()), e)
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::write_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            current_offset,
        })
    }

    /// Returns the offset the next record will be written at.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs. Returns the offset it was written at.
    ///
    /// On failure the log is cut back to where it was before the call, so a
    /// partial record never stays in front of later appends.
    pub fn append(&mut self, record: &LogRecord) -> StorageResult<u64> {
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.file.write_all(&serialized) {
            self.truncate_to(offset)?;
            return Err(StorageError::write_failed(
                format!("Failed to write document: {}", record.document_id),
                e,
            ));
        }
        if let Err(e) = self.file.sync_all() {
            self.truncate_to(offset)?;
            return Err(StorageError::write_failed(
                format!("fsync failed after writing document: {}", record.document_id),
                e,
            ));
        }

        self.current_offset += serialized.len() as u64;
        Ok(offset)
    }

    /// Drops everything after `offset`.
    fn truncate_to(&mut self, offset: u64) -> StorageResult<()> {
        self.file
            .set_len(offset)
            .and_then(|()| self.file.sync_all())
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to cut {} back to offset {}", self.path.display(), offset),
                    e,
                )
            })?;
        self.current_offset = offset;
        Ok(())
    }
}
