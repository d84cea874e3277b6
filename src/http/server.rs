//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the router service behind axum
//! - Wire up transport middleware (tracing, request timeout)
//! - Serve a bound listener until shutdown is signalled

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::service::RouterService;
use crate::routing::Router;

/// HTTP front end for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a server dispatching every request into `router`.
    pub fn new(router: Router, config: RouterConfig) -> Self {
        let service = RouterService::new(Arc::new(router));
        let app = Self::build_app(&config, service);
        Self { app, config }
    }

    /// Build the axum app with all transport layers.
    fn build_app(config: &RouterConfig, service: RouterService) -> axum::Router {
        axum::Router::new()
            .fallback_service(service)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires or its sender is dropped.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
