//! Webhook Gateway
//!
//! HTTP surface of the relay: resolves bearer tokens to destinations and
//! performs the send. Logical outcomes (unknown token, unsupported payload,
//! transport failure) are JSON bodies on HTTP 200; only the rate-limit
//! collaborator answers with an HTTP error code.

pub mod handlers;
pub mod payload;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State, middleware::from_fn_with_state, routing::get, Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    messenger::Messenger,
    network::ChatNetwork,
    ratelimit::{rate_limit_by_token, RateLimiter},
    registry::TokenRegistry,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Token registry over the destination store and live directory
    pub registry: TokenRegistry,
    /// Outbound send abstraction
    pub messenger: Messenger,
    /// Per-token rate limiter (optional)
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db: SqlitePool,
        network: Arc<dyn ChatNetwork>,
        config: Arc<Config>,
        rate_limiter: Option<RateLimiter>,
    ) -> Self {
        let registry = TokenRegistry::new(db, network.clone());
        let messenger = Messenger::new(network, Duration::from_secs(config.send_timeout_secs));
        Self {
            config,
            registry,
            messenger,
            rate_limiter,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Relay routes, rate limited per token ahead of the handlers
    let relay_routes = Router::new()
        .route(
            "/send/{token}",
            get(handlers::contact_send).post(handlers::contact_send_body),
        )
        .route("/room/{token}", get(handlers::room_send))
        .layer(from_fn_with_state(state.clone(), rate_limit_by_token));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(relay_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether rate limiting is enabled
    rate_limiting: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rate_limiting: state.rate_limiter.is_some(),
    })
}
