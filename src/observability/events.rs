//! Lifecycle events of the backend
//!
//! Events are explicit and typed; the wire name is what appears in the
//! `event` key of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & lifecycle
    /// Process startup begins
    BootStart,
    /// Startup complete, about to serve
    BootComplete,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped accepting connections
    ShutdownComplete,

    /// Configuration resolved from flags and environment
    ConfigLoaded,

    // Storage
    /// Storage backend opened
    StorageOpened,
    /// Storage backend not configured or failed to open
    StorageUnavailable,

    // Server
    /// Listener bound and serving
    ServerListening,
    /// Request answered with a success status
    RequestCompleted,
    /// Request answered with a client error status
    RequestRejected,
    /// Request answered with a server error status
    RequestFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "MASO_STARTUP_BEGIN",
            Event::BootComplete => "MASO_STARTUP_COMPLETE",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::StorageOpened => "STORAGE_OPENED",
            Event::StorageUnavailable => "STORAGE_UNAVAILABLE",

            Event::ServerListening => "SERVER_LISTENING",
            Event::RequestCompleted => "REQUEST_COMPLETE",
            Event::RequestRejected => "REQUEST_REJECTED",
            Event::RequestFailed => "REQUEST_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StorageUnavailable | Event::RequestRejected => Severity::Warn,
            Event::RequestFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
