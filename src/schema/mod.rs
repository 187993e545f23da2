//! Record schemas and request validation
//!
//! Each record kind (Machine, Order, Task, Attachment, Invoice) maps to one
//! storage collection and declares a static field table. Incoming JSON is
//! checked against that table first, collecting every violation, and only
//! then decoded into the typed record.
//!
//! # Rules
//!
//! - Required fields must be present and non-null
//! - Optional fields may be absent or null
//! - Types match exactly (no string-to-number coercion)
//! - Numeric bounds and enumerated values are enforced
//! - Undeclared fields are ignored and never persisted

mod errors;
mod records;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationDetails};
pub use records::{
    Attachment, Invoice, InvoiceItem, Machine, MachineStatus, Order, OrderItem, OrderPriority,
    OrderStatus, Record, StatusUpdate, Task, TaskStatus,
};
pub use types::{FieldDef, FieldType};
pub use validator::{json_type_name, validate_fields};
