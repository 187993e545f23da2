//! # HTTP Server
//!
//! Combines the endpoint routers into one axum server.
//!
//! - `/` and `/test`: liveness and diagnostics
//! - `/api/*`: orders, tasks, attachments, invoices and machines

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use super::attachment_routes::attachment_routes;
use super::config::ServerConfig;
use super::health_routes::health_routes;
use super::invoice_routes::invoice_routes;
use super::machine_routes::machine_routes;
use super::order_routes::order_routes;
use super::request_log::log_requests;
use super::state::AppState;
use super::task_routes::task_routes;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::StorageHandle;

/// HTTP server for the maso backend
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already connected storage handle
    pub fn new(config: ServerConfig, storage: StorageHandle) -> Self {
        let state = AppState::new(config.clone(), storage);
        let router = Self::build_router(state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(state: AppState) -> Router {
        // Any origin, method and header; credentials allowed
        let layers = ServiceBuilder::new()
            .layer(middleware::from_fn(log_requests))
            .layer(CorsLayer::very_permissive());

        let api = Router::new()
            .merge(order_routes(state.clone()))
            .merge(task_routes(state.clone()))
            .merge(attachment_routes(state.clone()))
            .merge(invoice_routes(state.clone()))
            .merge(machine_routes(state.clone()));

        Router::new()
            .merge(health_routes(state))
            .nest("/api", api)
            .layer(layers)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let local_addr = listener.local_addr()?.to_string();
        log_event_with_fields(Event::ServerListening, &[("addr", &local_addr)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until the process is killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    log_event(Event::ShutdownStart);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(ServerConfig::default(), StorageHandle::unavailable("not configured"));
        assert_eq!(server.socket_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(ServerConfig::with_port(8080), StorageHandle::ready(MemoryStore::new("maso")));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }
}
