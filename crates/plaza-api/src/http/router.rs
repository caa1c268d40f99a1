//! Axum router configuration with middleware.
//!
//! Routes match the polling clients' expectations exactly (no version
//! prefix). Middleware: permissive CORS and request tracing.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/participants", post(handlers::participant::join))
        .route("/participants", get(handlers::participant::list))
        .route("/messages", post(handlers::message::create))
        .route("/messages", get(handlers::message::list))
        .route("/messages/{id}", put(handlers::message::update))
        .route("/messages/{id}", delete(handlers::message::delete))
        .route("/status", post(handlers::status::heartbeat))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_check() -> &'static str {
    "ok"
}
