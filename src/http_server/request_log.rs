//! Request logging middleware
//!
//! One log line per request with method, path, status and duration. The
//! event (and so the severity) follows the status class.

use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::{log_event_with_fields, Event, Timer};

pub async fn log_requests(request: Request, next: Next) -> Response {
    let timer = Timer::new();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let event = if status.is_server_error() {
        Event::RequestFailed
    } else if status.is_client_error() {
        Event::RequestRejected
    } else {
        Event::RequestCompleted
    };
    log_event_with_fields(
        event,
        &[
            ("method", method.as_str()),
            ("path", &path),
            ("status", status.as_str()),
            ("duration_ms", &timer.elapsed_ms()),
        ],
    );
    response
}
