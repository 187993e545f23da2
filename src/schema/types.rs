//! Field table definitions
//!
//! Supported types:
//! - string: UTF-8 string
//! - int: integer (no fractional part)
//! - float: any JSON number
//! - datetime: RFC 3339 timestamp or `YYYY-MM-DD` date string
//! - enum: string restricted to a fixed set
//! - object: nested object with its own field table
//! - array: homogeneous array with an element type

/// Field data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    String,
    Int,
    Float,
    DateTime,
    /// String restricted to the listed values
    Enum(&'static [&'static str]),
    /// Nested object with its own field table
    Object(&'static [FieldDef]),
    /// Array whose elements all have the given type
    Array(&'static FieldType),
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "integer",
            FieldType::Float => "number",
            FieldType::DateTime => "RFC 3339 datetime or YYYY-MM-DD date",
            FieldType::Enum(_) => "string",
            FieldType::Object(_) => "object",
            FieldType::Array(_) => "array",
        }
    }
}

/// One declared field of a record kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    /// Whether the field must be present and non-null
    pub required: bool,
    /// Inclusive lower bound for numeric fields
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric fields
    pub max: Option<f64>,
}

impl FieldDef {
    /// A field that must be present
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            min: None,
            max: None,
        }
    }

    /// A field that may be absent or null
    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            min: None,
            max: None,
        }
    }

    /// Set an inclusive lower bound
    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set an inclusive upper bound
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}
