//! Payload validation against field tables
//!
//! Validation never stops at the first problem: every violated constraint is
//! collected with its path so a client can fix a request in one round trip.
//! The validator does not mutate the payload.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use super::errors::ValidationDetails;
use super::types::{FieldDef, FieldType};

/// Validates a payload against a field table, returning every violation.
///
/// An empty result means the payload is acceptable.
pub fn validate_fields(payload: &Value, fields: &[FieldDef]) -> Vec<ValidationDetails> {
    let mut violations = Vec::new();
    match payload.as_object() {
        Some(obj) => validate_object(obj, fields, "", &mut violations),
        None => violations.push(ValidationDetails::type_mismatch(
            "$root",
            "object",
            json_type_name(payload),
        )),
    }
    violations
}

fn validate_object(
    obj: &Map<String, Value>,
    fields: &[FieldDef],
    path_prefix: &str,
    violations: &mut Vec<ValidationDetails>,
) {
    for field in fields {
        let path = make_path(path_prefix, field.name);
        match obj.get(field.name) {
            None if field.required => violations.push(ValidationDetails::missing_field(path)),
            Some(Value::Null) if field.required => violations.push(ValidationDetails::null_value(path)),
            None | Some(Value::Null) => {}
            Some(value) => validate_value(value, field, &path, violations),
        }
    }
}

fn validate_value(value: &Value, field: &FieldDef, path: &str, violations: &mut Vec<ValidationDetails>) {
    validate_typed(value, &field.field_type, path, violations);

    let Some(number) = value.as_f64() else {
        return;
    };
    if let Some(min) = field.min {
        if number < min {
            violations.push(ValidationDetails::out_of_range(path, format!(">= {}", min), value.to_string()));
        }
    }
    if let Some(max) = field.max {
        if number > max {
            violations.push(ValidationDetails::out_of_range(path, format!("<= {}", max), value.to_string()));
        }
    }
}

fn validate_typed(value: &Value, field_type: &FieldType, path: &str, violations: &mut Vec<ValidationDetails>) {
    let mismatch = || ValidationDetails::type_mismatch(path, field_type.type_name(), json_type_name(value));

    match field_type {
        FieldType::String => {
            if !value.is_string() {
                violations.push(mismatch());
            }
        }
        FieldType::Int => {
            if !(value.is_i64() || value.is_u64()) {
                violations.push(mismatch());
            }
        }
        FieldType::Float => {
            if !value.is_number() {
                violations.push(mismatch());
            }
        }
        FieldType::DateTime => match value.as_str() {
            Some(s) if parse_datetime(s).is_some() => {}
            Some(s) => violations.push(ValidationDetails::type_mismatch(
                path,
                field_type.type_name(),
                format!("{:?}", s),
            )),
            None => violations.push(mismatch()),
        },
        FieldType::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => violations.push(ValidationDetails::not_allowed(path, allowed, format!("{:?}", s))),
            None => violations.push(mismatch()),
        },
        FieldType::Object(fields) => match value.as_object() {
            Some(obj) => validate_object(obj, fields, path, violations),
            None => violations.push(mismatch()),
        },
        FieldType::Array(element_type) => match value.as_array() {
            Some(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    let element_path = format!("{}[{}]", path, i);
                    if element.is_null() {
                        violations.push(ValidationDetails::null_value(element_path));
                    } else {
                        validate_typed(element, element_type, &element_path, violations);
                    }
                }
            }
            None => violations.push(mismatch()),
        },
    }
}

/// Parses an RFC 3339 timestamp, or a `YYYY-MM-DD` date as midnight UTC.
pub(crate) fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Returns the JSON type name of a value for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
