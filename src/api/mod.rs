//! API Module
//!
//! HTTP surface for rendering templates and operating the template cache.
//!
//! # Endpoints
//! - `GET /render/*name` - Render a template, optionally inside `?layout=`
//! - `GET /raw/*name` - Read a template through the cache
//! - `GET /fresh/*name` - Freshness check (purges stale entries)
//! - `DELETE /cache/*name` - Evict one template
//! - `DELETE /cache` - Evict every template
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
