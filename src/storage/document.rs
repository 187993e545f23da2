//! Document shape helpers
//!
//! Stored documents keep their identifier under `_id`. Callers outside the
//! storage layer only ever see it rendered as the string field `id`.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A stored JSON document
pub type Document = Map<String, Value>;

/// Internal identifier key
pub const ID_FIELD: &str = "_id";

/// Identifier key in rendered documents
pub const RENDERED_ID_FIELD: &str = "id";

/// Generates a fresh document identifier
pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a client-supplied identifier into its canonical form.
///
/// Returns `None` when the string is not a structurally valid identifier.
pub fn parse_document_id(s: &str) -> Option<String> {
    Uuid::parse_str(s).ok().map(|id| id.hyphenated().to_string())
}

/// Current time as stored in `created_at`/`updated_at`
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Assigns identifier and creation timestamps, replacing any existing values.
pub(crate) fn stamp_new(mut document: Document, id: &str) -> Document {
    let now = Value::String(timestamp_now());
    document.remove(RENDERED_ID_FIELD);
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    document.insert("created_at".to_string(), now.clone());
    document.insert("updated_at".to_string(), now);
    document
}

/// Returns the stored identifier of a document
pub(crate) fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

/// Renders a stored document for callers: `_id` becomes the string `id`.
pub fn render_document(document: &Document) -> Value {
    let mut rendered = document.clone();
    if let Some(id) = rendered.remove(ID_FIELD) {
        let id = match id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        rendered.insert(RENDERED_ID_FIELD.to_string(), Value::String(id));
    }
    Value::Object(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_ids_are_distinct() {
        let a = new_document_id();
        let b = new_document_id();
        assert_ne!(a, b);
        assert_eq!(parse_document_id(&a), Some(a));
    }

    #[test]
    fn test_parse_document_id() {
        assert!(parse_document_id("not-an-id").is_none());
        assert!(parse_document_id("").is_none());
        assert!(parse_document_id(" 67e55044-10b1-426f-9247-bb680e5fe0c8").is_none());
        assert!(parse_document_id("67e55044-10b1-426f-9247-bb680e5fe0c8\n").is_none());
        assert_eq!(
            parse_document_id("67E55044-10B1-426F-9247-BB680E5FE0C8").as_deref(),
            Some("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
    }

    #[test]
    fn test_stamp_new_overrides_client_ids() {
        let doc = json!({"id": "client", "_id": "client", "name": "Bend"});
        let stamped = stamp_new(doc.as_object().unwrap().clone(), "server-id");
        assert_eq!(stamped["_id"], "server-id");
        assert!(stamped.get("id").is_none());
        assert_eq!(stamped["created_at"], stamped["updated_at"]);
    }

    #[test]
    fn test_render_document() {
        let doc = json!({"_id": "abc", "name": "Bend"});
        let rendered = render_document(doc.as_object().unwrap());
        assert_eq!(rendered, json!({"id": "abc", "name": "Bend"}));
    }
}
