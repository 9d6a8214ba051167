//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID)
//! - Own the expiry sweeper for the lifetime of the server
//! - Publish the initial (empty) routing document on start
//! - Graceful shutdown on the shared shutdown signal

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RegistryConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::registry::{ExpirySweeper, Registry};
use crate::routing::ConfigPublisher;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub publisher: Arc<ConfigPublisher>,
}

/// HTTP server for the registration API.
pub struct RegistryServer {
    router: Router,
    config: RegistryConfig,
    registry: Arc<Registry>,
    publisher: Arc<ConfigPublisher>,
}

impl RegistryServer {
    /// Create a new server with an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let publisher = Arc::new(ConfigPublisher::from_config(&config.routing));

        let state = AppState {
            registry: registry.clone(),
            publisher: publisher.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            registry,
            publisher,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RegistryConfig, state: AppState) -> Router {
        Router::new()
            .route("/register", post(handlers::register))
            .route("/heartbeat", post(handlers::heartbeat))
            .route("/unregister", post(handlers::unregister))
            .route("/status", get(handlers::status))
            .route("/clients", get(handlers::list_clients))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Router with state attached, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn publisher(&self) -> &Arc<ConfigPublisher> {
        &self.publisher
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            artifact = %self.publisher.path().display(),
            "HTTP server starting"
        );

        let mut server_shutdown = shutdown.subscribe();
        let sweeper = ExpirySweeper::new(
            self.registry.clone(),
            self.publisher.clone(),
            self.config.liveness.sweep_interval,
            self.config.liveness.heartbeat_timeout,
        );
        let sweeper_handle = tokio::spawn(sweeper.run(shutdown.subscribe()));

        // Clear routes a previous process may have left behind
        self.publisher.regenerate(&self.registry).await;

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.recv().await;
            })
            .await;

        // Stop the sweeper even if serving failed
        shutdown.trigger();
        if let Err(e) = sweeper_handle.await {
            tracing::error!(error = %e, "Expiry sweeper task failed");
        }

        tracing::info!("HTTP server stopped");
        result
    }
}
