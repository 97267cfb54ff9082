//! API Routes
//!
//! Configures the Axum router with the template cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, evict_handler, fresh_handler, health_handler, raw_handler, render_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /render/*name` - Render a template, optionally inside `?layout=`
/// - `GET /raw/*name` - Read a template's raw source through the cache
/// - `GET /fresh/*name` - Check whether the cached copy is fresh
/// - `DELETE /cache/*name` - Evict one template
/// - `DELETE /cache` - Evict every template
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/render/*name", get(render_handler))
        .route("/raw/*name", get(raw_handler))
        .route("/fresh/*name", get(fresh_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/*name", delete(evict_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
