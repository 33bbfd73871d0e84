//! # HTTP Server
//!
//! Nests the gateway routes under the configured root, adds a health check
//! and CORS, and serves until ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::gateway_routes::{gateway_routes, GatewayState};
use crate::gateway::Gateway;
use crate::observability::{log_event, log_event_with_fields, Event};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    (StatusCode::OK, Json(response))
}

/// HTTP server for one gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, gateway: Arc<Gateway>) -> Self {
        let router = Self::build_router(&config, gateway);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, gateway: Arc<Gateway>) -> Router {
        let state = GatewayState::new(gateway, config.jwt_secret.as_deref());

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

        let root = config.normalized_root();
        let routes = gateway_routes(state);
        let router = if root.is_empty() {
            routes
        } else {
            Router::new().nest(&root, routes)
        };

        Router::new()
            .route("/health", get(health_handler))
            .merge(router)
            .layer(cors)
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let shown = addr.to_string();
        let root = self.config.normalized_root();
        log_event_with_fields(
            Event::ServerStarting,
            &[("addr", shown.as_str()), ("root", root.as_str())],
        );

        let listener = TcpListener::bind(addr).await?;
        log_event_with_fields(Event::Serving, &[("addr", shown.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // A failed handler install leaves the server running until killed.
    if tokio::signal::ctrl_c().await.is_ok() {
        log_event(Event::ShutdownStart);
    } else {
        std::future::pending::<()>().await;
    }
}
