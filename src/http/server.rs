//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the prerender binding
//! - Mount the origin as next handler when one is configured
//! - Wire up middleware (tracing, request timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, routing::any, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RelayConfig;
use crate::http::middleware::{prerender_handler, prerender_middleware};
use crate::http::origin::{origin_handler, Origin};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::prerender::{Prerender, PrerenderError};

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Prerender(#[from] PrerenderError),

    #[error("invalid origin address '{address}': {reason}")]
    Origin { address: String, reason: String },
}

/// HTTP server fronting the origin with the prerender middleware.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let prerender = Arc::new(Prerender::from_config(&config)?);
        Self::with_prerender(config, prerender)
    }

    /// Create a server around an already constructed prerender core.
    pub fn with_prerender(config: RelayConfig, prerender: Arc<Prerender>) -> Result<Self, ServerError> {
        let origin = match &config.origin.address {
            Some(address) => Some(Arc::new(Origin::new(address).map_err(|e| ServerError::Origin {
                address: address.clone(),
                reason: e.to_string(),
            })?)),
            None => None,
        };

        let router = Self::build_router(&config, prerender, origin);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, prerender: Arc<Prerender>, origin: Option<Arc<Origin>>) -> Router {
        let app = match origin {
            Some(origin) => Router::new()
                .route("/{*path}", any(origin_handler))
                .route("/", any(origin_handler))
                .with_state(origin)
                .layer(from_fn_with_state(prerender, prerender_middleware)),
            None => Router::new()
                .route("/{*path}", any(prerender_handler))
                .route("/", any(prerender_handler))
                .with_state(prerender),
        };

        app.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service_url = %self.config.prerender.service_url,
            bots_only = self.config.prerender.bots_only,
            origin = ?self.config.origin.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving the server without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}
