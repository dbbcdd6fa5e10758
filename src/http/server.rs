//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, security, access gate, CORS)
//! - Bind server to listener
//! - Run background maintenance (rate limit window purge)
//! - Graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::{handlers, request};
use crate::observability::metrics;
use crate::presence::{PresenceClient, PresenceError};
use crate::security::cors::{origin_guard_middleware, OriginPolicy};
use crate::security::headers::apply_security_headers;
use crate::security::rate_limit::{access_gate_middleware, AccessGate};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub presence: PresenceClient,
}

/// HTTP server for the edge service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    gate: Arc<AccessGate>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The access gate is built here, once, and shared by every request.
    pub fn new(config: ServiceConfig) -> Result<Self, PresenceError> {
        let presence = PresenceClient::new(&config.presence)?;
        let gate = Arc::new(AccessGate::from_config(&config.access));

        let state = AppState { presence };
        let router = Self::build_router(&config, state, gate.clone());

        Ok(Self {
            router,
            config,
            gate,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost first: request ID → trace → metrics →
    /// security headers → access gate → origin guard → CORS → handler.
    fn build_router(config: &ServiceConfig, state: AppState, gate: Arc<AccessGate>) -> Router {
        let policy = OriginPolicy::from_config(&config.cors);
        let cors = policy.cors_layer();

        let mut router = Router::new()
            .route("/", get(handlers::index))
            .route("/discord/{user_id}", get(handlers::discord))
            .route("/{month}/{day}/{year}", get(handlers::age))
            .fallback(handlers::not_found)
            .with_state(state)
            .layer(cors)
            .layer(middleware::from_fn_with_state(
                Arc::new(policy),
                origin_guard_middleware,
            ))
            .layer(middleware::from_fn_with_state(gate, access_gate_middleware));

        if config.security.enable_headers {
            router = router.layer(middleware::map_response(apply_security_headers));
        }

        router
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            allowed_ip = %self.config.access.allowed_ip,
            "running: http://localhost:{}",
            addr.port()
        );

        let purge = self.gate.clone().spawn_purge_task(shutdown.resubscribe());

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        purge.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
