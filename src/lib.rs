//! maso - production-order management backend
//!
//! Orders, tasks, attachments, invoices and machines stored as JSON
//! documents and served over an HTTP JSON API.
//!
//! - [`schema`]: record kinds and field validation
//! - [`storage`]: document store backends (in-memory, checksummed file logs)
//! - [`http_server`]: axum routes, errors and the server
//! - [`cli`]: `maso serve` and `maso diagnose`

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod storage;
