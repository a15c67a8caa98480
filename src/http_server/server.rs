//! # HTTP Server
//!
//! Assembles the item router and serves it until a shutdown signal fires.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::{item_routes, ItemsState};
use crate::observability::{log_event_with_fields, Event};
use crate::session::Database;

use super::config::HttpServerConfig;

/// HTTP server for the item API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server that serves items from `db`
    pub fn new(config: HttpServerConfig, db: Database) -> Self {
        let router = Self::build_router(&config, db);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, db: Database) -> Router {
        let items_state = Arc::new(ItemsState::new(db));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new().merge(item_routes(items_state)).layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind the configured address
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.config.socket_addr()).await
    }

    /// Serve on `listener` until `shutdown` resolves, then wait for in-flight
    /// requests
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?.to_string();
        log_event_with_fields(Event::Serving, &[("addr", &local_addr)]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, returning which signal fired
pub async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            },
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                "SIGINT"
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        "SIGINT"
    }
}
