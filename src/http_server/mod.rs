//! # HTTP Server Module
//!
//! JSON API over the document store.
//!
//! # Endpoints
//!
//! - `GET /` - Liveness message
//! - `GET /test` - Storage and configuration diagnostics
//! - `/api/orders`, `/api/tasks`, `/api/attachments`, `/api/invoices`,
//!   `/api/machines` - create and list records
//! - `PATCH /api/tasks/:task_id/status` - update a task's status

pub mod attachment_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod invoice_routes;
pub mod machine_routes;
pub mod order_routes;
pub mod request_log;
pub mod server;
pub mod state;
pub mod task_routes;

pub use config::ServerConfig;
pub use errors::{ApiError, ApiResult};
pub use health_routes::{diagnose, DiagnosticReport};
pub use server::HttpServer;
pub use state::AppState;
