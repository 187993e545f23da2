//! Observability for the maso backend
//!
//! - Structured logging (one JSON object per line)
//! - Typed lifecycle events
//! - Request timing
//!
//! Logging never fails a request: write errors on stdout/stderr are ignored.
//!
//! # Usage
//!
//! ```ignore
//! use maso::observability::{log_event_with_fields, Event, Logger, Timer};
//!
//! Logger::info("ORDER_CREATED", &[("id", "…")]);
//! log_event_with_fields(Event::ServerListening, &[("addr", "0.0.0.0:8000")]);
//!
//! let timer = Timer::new();
//! // ... handle request ...
//! Logger::info("REQUEST", &[("duration_ms", &timer.elapsed_ms())]);
//! ```

mod events;
mod logger;
mod timer;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use timer::Timer;

/// Log a lifecycle event at the severity the event implies
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    match event.severity() {
        Severity::Error | Severity::Fatal => Logger::log_stderr(event.severity(), event.as_str(), fields),
        severity => Logger::log(severity, event.as_str(), fields),
    }
}
