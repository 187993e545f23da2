//! Storage error types
//!
//! Error codes:
//! - MASO_STORAGE_UNAVAILABLE (ERROR): no backend configured or it failed to open
//! - MASO_STORAGE_WRITE_FAILED (ERROR)
//! - MASO_STORAGE_READ_FAILED (ERROR)
//! - MASO_STORAGE_INVALID_REQUEST (ERROR): bad collection name or document shape
//! - MASO_DATA_CORRUPTION (FATAL): checksum or framing failure in a log

use std::fmt;
use std::io;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// The backend cannot be trusted any more
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    Unavailable,
    WriteFailed,
    ReadFailed,
    InvalidRequest,
    DataCorruption,
}

impl StorageErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StorageErrorCode::Unavailable => "MASO_STORAGE_UNAVAILABLE",
            StorageErrorCode::WriteFailed => "MASO_STORAGE_WRITE_FAILED",
            StorageErrorCode::ReadFailed => "MASO_STORAGE_READ_FAILED",
            StorageErrorCode::InvalidRequest => "MASO_STORAGE_INVALID_REQUEST",
            StorageErrorCode::DataCorruption => "MASO_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StorageErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage error with context
#[derive(Debug)]
pub struct StorageError {
    code: StorageErrorCode,
    message: String,
    /// Where the error happened, e.g. a byte offset or a document id
    details: Option<String>,
    source: Option<io::Error>,
}

impl StorageError {
    fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Storage is not configured or failed to open
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::Unavailable, message)
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::WriteFailed, message)
        }
    }

    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StorageErrorCode::ReadFailed, message)
        }
    }

    /// Internal state could not be accessed (e.g. a poisoned lock)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::ReadFailed, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::InvalidRequest, message)
    }

    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::DataCorruption, message)
    }

    /// Data corruption with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("byte_offset: {}", offset)),
            ..Self::new(StorageErrorCode::DataCorruption, reason)
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StorageErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the backend that produced this error is unusable
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn is_unavailable(&self) -> bool {
        self.code == StorageErrorCode::Unavailable
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
