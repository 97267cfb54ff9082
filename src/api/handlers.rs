//! API Handlers
//!
//! HTTP request handlers for rendering templates and for inspecting and
//! invalidating the template cache.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::engine::{
    CompiledTemplate, FileStore, HandlebarsCompiler, LocalFileStore, TemplateCache,
    TemplateEngine,
};
use crate::error::Result;
use crate::models::{EvictResponse, FreshResponse, HealthResponse, RawResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The engine and its cache are internally synchronized, so cloning the
/// state shares one cache and one template registry between requests.
#[derive(Clone)]
pub struct AppState {
    /// Handlebars engine rendering through the cache
    pub engine: Arc<TemplateEngine<HandlebarsCompiler>>,
    /// The engine's template cache
    pub cache: TemplateCache<CompiledTemplate>,
}

impl AppState {
    /// Creates a new AppState around an existing engine.
    pub fn new(engine: TemplateEngine<HandlebarsCompiler>) -> Self {
        let cache = engine.cache().clone();
        Self {
            engine: Arc::new(engine),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Templates are loaded from `template_root` on the local filesystem.
    pub fn from_config(config: &Config) -> Self {
        let files: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.template_root));
        let cache = TemplateCache::new(files, config.max_entries);
        let engine = TemplateEngine::new(HandlebarsCompiler::new(), cache)
            .with_content_type(config.content_type.as_str())
            .with_content_encoding(config.content_encoding.as_str());
        Self::new(engine)
    }
}

/// Handler for GET /render/*name
///
/// Renders the template with the query string as its context. The reserved
/// `layout` parameter names a layout to splice the template into.
pub async fn render_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let layout = params.remove("layout");
    let context = Value::Object(
        params
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    );

    let html = match layout {
        Some(layout) => {
            debug!(template = %name, layout = %layout, "rendering with layout");
            state.engine.render_with_layout(&name, &layout, &context).await?
        }
        None => state.engine.render(&name, &context).await?,
    };

    let content_type = format!(
        "{}; charset={}",
        state.engine.content_type(),
        state.engine.content_encoding()
    );
    Ok(([(header::CONTENT_TYPE, content_type)], html).into_response())
}

/// Handler for GET /raw/*name
///
/// Reads the template through the cache, loading it if missing or stale.
pub async fn raw_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RawResponse>> {
    let content = state.cache.read(&name).await?;

    Ok(Json(RawResponse {
        name,
        content_type: state.engine.content_type().to_string(),
        content_encoding: state.engine.content_encoding().to_string(),
        content,
    }))
}

/// Handler for GET /fresh/*name
///
/// Reports freshness; a stale entry is purged as a side effect.
pub async fn fresh_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<FreshResponse> {
    let fresh = state.cache.is_fresh(&name).await;
    Json(FreshResponse::new(name, fresh))
}

/// Handler for DELETE /cache/*name
pub async fn evict_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Json<EvictResponse> {
    let removed = state.cache.remove(&name);
    if removed {
        info!(template = %name, "template evicted on request");
    }
    Json(EvictResponse::single(&name, removed))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<EvictResponse> {
    let removed = state.cache.invalidate_all();
    info!(removed, "template cache cleared on request");
    Json(EvictResponse::all(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.capacity()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
