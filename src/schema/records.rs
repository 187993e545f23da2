//! Typed record kinds
//!
//! Each record kind is stored in the collection named by [`Record::KIND`].
//! Field tables mirror the struct definitions; defaults are applied by serde
//! after validation succeeds.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult, ValidationDetails};
use super::types::{FieldDef, FieldType};
use super::validator::{parse_datetime, validate_fields};

/// A record kind that can be validated from a raw JSON payload
pub trait Record: Serialize + DeserializeOwned {
    /// Record kind name, also the storage collection name
    const KIND: &'static str;

    /// Declared fields
    const FIELDS: &'static [FieldDef];

    /// Validates the payload and decodes it into the typed record.
    ///
    /// # Errors
    ///
    /// `SchemaError::ValidationFailed` listing every violated constraint.
    fn from_payload(payload: Value) -> SchemaResult<Self> {
        let violations = validate_fields(&payload, Self::FIELDS);
        if !violations.is_empty() {
            return Err(SchemaError::validation_failed(Self::KIND, violations));
        }
        serde_json::from_value(payload).map_err(|e| SchemaError::Decode {
            record: Self::KIND,
            message: e.to_string(),
        })
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                #[doc = $text]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted wire value
            pub const NAMES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

string_enum! {
    /// Shop-floor machine state
    MachineStatus { Idle => "idle", Running => "running", Maintenance => "maintenance", Offline => "offline" }
    default Idle
}

string_enum! {
    /// Order urgency
    OrderPriority { Low => "low", Normal => "normal", High => "high", Urgent => "urgent" }
    default Normal
}

string_enum! {
    /// Overall order state
    OrderStatus {
        Draft => "draft",
        Scheduled => "scheduled",
        InProgress => "in_progress",
        Completed => "completed",
        Invoiced => "invoiced",
        Cancelled => "cancelled",
    }
    default Draft
}

string_enum! {
    /// Task progress state.
    ///
    /// Any state may be set from any other; no transition table is enforced.
    TaskStatus {
        Queued => "queued",
        Assigned => "assigned",
        InProgress => "in_progress",
        Paused => "paused",
        Done => "done",
        Rejected => "rejected",
    }
    default Queued
}

/// Machine available on the shop floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    /// Machine type, e.g. laser, press brake, punch
    #[serde(default, rename = "type")]
    pub machine_type: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: MachineStatus,
}

impl Record for Machine {
    const KIND: &'static str = "machine";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("name", FieldType::String),
        FieldDef::optional("group", FieldType::String),
        FieldDef::optional("type", FieldType::String),
        FieldDef::optional("status", FieldType::Enum(MachineStatus::NAMES)),
    ];
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Part number or SKU
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: u64,
    #[serde(default, deserialize_with = "or_default")]
    pub unit_price: f64,
}

const ORDER_ITEM_FIELDS: &[FieldDef] = &[
    FieldDef::required("sku", FieldType::String),
    FieldDef::optional("description", FieldType::String),
    FieldDef::required("quantity", FieldType::Int).min(1.0),
    FieldDef::optional("unit_price", FieldType::Float).min(0.0),
];

/// Production order raised by a manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub customer: String,
    /// Customer purchase order number
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub items: Vec<OrderItem>,
    #[serde(default, deserialize_with = "or_default")]
    pub priority: OrderPriority,
    /// Requested delivery date
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: OrderStatus,
}

impl Record for Order {
    const KIND: &'static str = "order";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("customer", FieldType::String),
        FieldDef::optional("po_number", FieldType::String),
        FieldDef::optional("items", FieldType::Array(&FieldType::Object(ORDER_ITEM_FIELDS))),
        FieldDef::optional("priority", FieldType::Enum(OrderPriority::NAMES)),
        FieldDef::optional("due_date", FieldType::DateTime),
        FieldDef::optional("notes", FieldType::String),
        FieldDef::optional("status", FieldType::Enum(OrderStatus::NAMES)),
    ];
}

/// Executable task linked to an order and optionally a machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub order_id: String,
    /// e.g. laser cut, bend, weld
    pub name: String,
    #[serde(default)]
    pub machine_id: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    /// Employee name or id
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub status: TaskStatus,
    #[serde(default)]
    pub estimated_minutes: Option<u64>,
    #[serde(default)]
    pub actual_minutes: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for Task {
    const KIND: &'static str = "task";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("order_id", FieldType::String),
        FieldDef::required("name", FieldType::String),
        FieldDef::optional("machine_id", FieldType::String),
        FieldDef::optional("group", FieldType::String),
        FieldDef::optional("assignee", FieldType::String),
        FieldDef::optional("status", FieldType::Enum(TaskStatus::NAMES)),
        FieldDef::optional("estimated_minutes", FieldType::Int).min(0.0),
        FieldDef::optional("actual_minutes", FieldType::Int).min(0.0),
        FieldDef::optional("notes", FieldType::String),
    ];
}

/// Attachment metadata (drawings, DXF, PDF). Content lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub order_id: String,
    pub filename: String,
    /// Public URL if uploaded to external storage
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl Record for Attachment {
    const KIND: &'static str = "attachment";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("order_id", FieldType::String),
        FieldDef::required("filename", FieldType::String),
        FieldDef::optional("url", FieldType::String),
        FieldDef::optional("mime_type", FieldType::String),
        FieldDef::optional("size_bytes", FieldType::Int).min(0.0),
    ];
}

/// Line item of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: u64,
    pub unit_price: f64,
}

const INVOICE_ITEM_FIELDS: &[FieldDef] = &[
    FieldDef::required("description", FieldType::String),
    FieldDef::required("quantity", FieldType::Int).min(1.0),
    FieldDef::required("unit_price", FieldType::Float).min(0.0),
];

/// Invoice for an order. Totals are always recomputed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub order_id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub items: Vec<InvoiceItem>,
    #[serde(default, deserialize_with = "or_default")]
    pub subtotal: f64,
    /// Fraction, e.g. 0.18 for 18%
    #[serde(default, deserialize_with = "or_default")]
    pub tax_rate: f64,
    #[serde(default, deserialize_with = "or_default")]
    pub total: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Invoice {
    /// Returns `(subtotal, total)` computed from the items, each rounded to
    /// two decimals. `total` is derived from the unrounded subtotal.
    pub fn compute_totals(&self) -> (f64, f64) {
        let subtotal: f64 = self
            .items
            .iter()
            .map(|item| item.quantity as f64 * item.unit_price)
            .sum();
        let total = subtotal * (1.0 + self.tax_rate);
        (round_cents(subtotal), round_cents(total))
    }

    /// Replaces any client-supplied subtotal and total with computed values.
    ///
    /// Fails when either total overflows, since JSON has no representation
    /// for non-finite numbers.
    pub fn with_computed_totals(mut self) -> SchemaResult<Self> {
        let (subtotal, total) = self.compute_totals();
        let details: Vec<_> = [("subtotal", subtotal), ("total", total)]
            .into_iter()
            .filter(|(_, value)| !value.is_finite())
            .map(|(field, value)| ValidationDetails::new(field, "finite number", value.to_string()))
            .collect();
        if !details.is_empty() {
            return Err(SchemaError::validation_failed(Self::KIND, details));
        }
        self.subtotal = subtotal;
        self.total = total;
        Ok(self)
    }
}

impl Record for Invoice {
    const KIND: &'static str = "invoice";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("order_id", FieldType::String),
        FieldDef::optional("items", FieldType::Array(&FieldType::Object(INVOICE_ITEM_FIELDS))),
        FieldDef::optional("subtotal", FieldType::Float).min(0.0),
        FieldDef::optional("tax_rate", FieldType::Float).min(0.0).max(1.0),
        FieldDef::optional("total", FieldType::Float).min(0.0),
        FieldDef::optional("notes", FieldType::String),
    ];
}

/// Partial update of a task's status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: TaskStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Record for StatusUpdate {
    const KIND: &'static str = "status_update";
    const FIELDS: &'static [FieldDef] = &[
        FieldDef::required("status", FieldType::Enum(TaskStatus::NAMES)),
        FieldDef::optional("notes", FieldType::String),
    ];
}

/// Rounds the exact binary value to two decimals, ties to even
fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Treats an explicit `null` like an absent field
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) => parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid due_date: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_defaults() {
        let order = Order::from_payload(json!({"customer": "Acme"})).unwrap();
        assert_eq!(order.priority, OrderPriority::Normal);
        assert_eq!(order.status, OrderStatus::Draft);
        assert!(order.items.is_empty());
        assert_eq!(order.due_date, None);
    }

    #[test]
    fn test_order_item_unit_price_defaults_to_zero() {
        let order = Order::from_payload(json!({
            "customer": "Acme",
            "items": [{"sku": "BR-10", "quantity": 4}],
            "due_date": "2024-07-15"
        }))
        .unwrap();
        assert_eq!(order.items[0].unit_price, 0.0);
        assert_eq!(order.due_date.unwrap().to_rfc3339(), "2024-07-15T00:00:00+00:00");
    }

    #[test]
    fn test_order_rejects_bad_enum_and_quantity() {
        let err = Order::from_payload(json!({
            "customer": "Acme",
            "priority": "asap",
            "items": [{"sku": "BR-10", "quantity": 0}]
        }))
        .unwrap_err();
        let fields: Vec<_> = err.details().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["items[0].quantity", "priority"]);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let task = Task::from_payload(json!({
            "order_id": "o1",
            "name": "Bend",
            "id": "client-chosen",
            "color": "red"
        }))
        .unwrap();
        let doc = serde_json::to_value(&task).unwrap();
        assert!(doc.get("id").is_none());
        assert!(doc.get("color").is_none());
        assert_eq!(doc["status"], "queued");
    }

    #[test]
    fn test_task_minutes_must_be_non_negative() {
        let err = Task::from_payload(json!({"order_id": "o1", "name": "Weld", "actual_minutes": -5}))
            .unwrap_err();
        assert_eq!(err.details()[0].field, "actual_minutes");
        assert_eq!(err.details()[0].expected, ">= 0");
    }

    #[test]
    fn test_machine_type_field_name() {
        let machine = Machine::from_payload(json!({"name": "Trumpf 3030", "type": "Laser"})).unwrap();
        assert_eq!(machine.machine_type.as_deref(), Some("Laser"));
        assert_eq!(machine.status, MachineStatus::Idle);
        let doc = serde_json::to_value(&machine).unwrap();
        assert_eq!(doc["type"], "Laser");
    }

    #[test]
    fn test_attachment_requires_filename() {
        let err = Attachment::from_payload(json!({"order_id": "o1", "size_bytes": -1})).unwrap_err();
        let fields: Vec<_> = err.details().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["filename", "size_bytes"]);
    }

    #[test]
    fn test_invoice_totals() {
        let invoice = Invoice::from_payload(json!({
            "order_id": "o1",
            "items": [{"description": "Cut", "quantity": 3, "unit_price": 10.0}],
            "tax_rate": 0.1
        }))
        .unwrap();
        assert_eq!(invoice.compute_totals(), (30.0, 33.0));
    }

    #[test]
    fn test_invoice_overrides_client_totals() {
        let invoice = Invoice::from_payload(json!({
            "order_id": "o1",
            "items": [
                {"description": "Cut", "quantity": 2, "unit_price": 12.345},
                {"description": "Bend", "quantity": 1, "unit_price": 0.5}
            ],
            "subtotal": 999.0,
            "total": 999.0,
            "tax_rate": 0.2
        }))
        .unwrap()
        .with_computed_totals()
        .unwrap();
        assert_eq!(invoice.subtotal, 25.19);
        assert_eq!(invoice.total, 30.23);
    }

    #[test]
    fn test_invoice_rounding_ties_go_to_even() {
        let invoice = Invoice::from_payload(json!({
            "order_id": "o1",
            "items": [{"description": "Washer", "quantity": 1, "unit_price": 0.125}]
        }))
        .unwrap();
        assert_eq!(invoice.compute_totals(), (0.12, 0.12));

        let invoice = Invoice::from_payload(json!({
            "order_id": "o1",
            "items": [{"description": "Washer", "quantity": 3, "unit_price": 0.125}]
        }))
        .unwrap();
        assert_eq!(invoice.compute_totals(), (0.38, 0.38));
    }

    #[test]
    fn test_invoice_overflowing_totals_rejected() {
        let err = Invoice::from_payload(json!({
            "order_id": "o1",
            "items": [{"description": "Ingot", "quantity": 10, "unit_price": 1e308}]
        }))
        .unwrap()
        .with_computed_totals()
        .unwrap_err();
        let fields: Vec<_> = err.details().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["subtotal", "total"]);
        assert_eq!(err.details()[0].expected, "finite number");
    }

    #[test]
    fn test_invoice_tax_rate_bounds() {
        let err = Invoice::from_payload(json!({"order_id": "o1", "tax_rate": 1.5})).unwrap_err();
        assert_eq!(err.details()[0].field, "tax_rate");
        assert_eq!(err.details()[0].expected, "<= 1");
    }

    #[test]
    fn test_empty_invoice_totals_are_zero() {
        let invoice = Invoice::from_payload(json!({"order_id": "o1"})).unwrap();
        assert_eq!(invoice.compute_totals(), (0.0, 0.0));
    }

    #[test]
    fn test_status_update_requires_known_status() {
        let update = StatusUpdate::from_payload(json!({"status": "paused"})).unwrap();
        assert_eq!(update.status, TaskStatus::Paused);
        assert_eq!(update.notes, None);

        let err = StatusUpdate::from_payload(json!({"status": "finished"})).unwrap_err();
        assert_eq!(err.details()[0].field, "status");
        assert!(StatusUpdate::from_payload(json!({})).is_err());
    }

    #[test]
    fn test_null_defaults() {
        let invoice = Invoice::from_payload(json!({"order_id": "o1", "items": null, "tax_rate": null}))
            .unwrap();
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.tax_rate, 0.0);
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(TaskStatus::NAMES.len(), 6);
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(OrderStatus::default().as_str(), "draft");
    }
}
