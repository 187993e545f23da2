//! Validation error types

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One violated field constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    /// Field path (e.g. "items[1].quantity")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn null_value(field: impl Into<String>) -> Self {
        Self::new(field, "non-null value", "null")
    }

    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn out_of_range(field: impl Into<String>, bound: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, bound, actual)
    }

    pub fn not_allowed(field: impl Into<String>, allowed: &[&str], actual: impl Into<String>) -> Self {
        Self::new(field, format!("one of [{}]", allowed.join(", ")), actual)
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Schema error
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// The payload violates one or more field constraints
    #[error("{record} validation failed: {}", summarize(.details))]
    ValidationFailed {
        /// Record kind being validated
        record: &'static str,
        /// Every violated constraint, in field order
        details: Vec<ValidationDetails>,
    },

    /// The payload passed validation but could not be decoded
    #[error("{record} could not be decoded: {message}")]
    Decode {
        record: &'static str,
        message: String,
    },
}

impl SchemaError {
    pub fn validation_failed(record: &'static str, details: Vec<ValidationDetails>) -> Self {
        SchemaError::ValidationFailed { record, details }
    }

    /// Field-level details, empty for decode errors
    pub fn details(&self) -> &[ValidationDetails] {
        match self {
            SchemaError::ValidationFailed { details, .. } => details,
            SchemaError::Decode { .. } => &[],
        }
    }
}

fn summarize(details: &[ValidationDetails]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
