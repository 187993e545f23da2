//! Exact-match query filters

use serde_json::Value;

use super::document::Document;

/// Conjunction of `field == value` conditions. An empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// A filter that matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Adds an equality condition when a value is present
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    /// A missing field never matches
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
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
    fn test_empty_filter_matches_all() {
        assert!(Filter::new().matches(&doc(json!({"a": 1}))));
        assert!(Filter::new().matches(&Document::new()));
    }

    #[test]
    fn test_exact_match() {
        let filter = Filter::new().eq("order_id", "o1").eq("status", "done");
        assert!(filter.matches(&doc(json!({"order_id": "o1", "status": "done", "x": 1}))));
        assert!(!filter.matches(&doc(json!({"order_id": "o1", "status": "queued"}))));
        assert!(!filter.matches(&doc(json!({"status": "done"}))));
    }

    #[test]
    fn test_no_type_coercion() {
        let filter = Filter::new().eq("size_bytes", "10");
        assert!(!filter.matches(&doc(json!({"size_bytes": 10}))));
    }

    #[test]
    fn test_eq_opt() {
        let filter = Filter::new().eq_opt("order_id", None::<String>).eq_opt("status", Some("done"));
        assert_eq!(filter, Filter::new().eq("status", "done"));
        assert!(filter.matches(&doc(json!({"order_id": "o9", "status": "done"}))));
    }
}
