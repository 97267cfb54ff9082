//! Error types for the template cache
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Template Cache Error Enum ==
/// Unified error type for the template cache.
///
/// `Clone` so that every caller joined on one in-flight load receives the
/// same outcome.
#[derive(Error, Debug, Clone)]
pub enum TemplateCacheError {
    /// Backing file does not exist
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Stat or read failed for any other reason
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: Arc<io::Error>,
    },

    /// Compiled artifact attached to a key that has no raw entry
    #[error("Not in cache: {0}")]
    NotInCache(String),

    /// The bound template compiler rejected the source
    #[error("Compile error: {0}")]
    Compile(String),

    /// The bound template compiler failed while rendering
    #[error("Render error: {0}")]
    Render(String),
}

impl TemplateCacheError {
    // == From I/O ==
    /// Classifies an I/O error for `path`, splitting out `NotFound`.
    pub fn from_io(path: &str, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            TemplateCacheError::NotFound(path.to_string())
        } else {
            TemplateCacheError::Io {
                path: path.to_string(),
                source: Arc::new(err),
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for TemplateCacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            TemplateCacheError::NotFound(_) => StatusCode::NOT_FOUND,
            TemplateCacheError::NotInCache(_) => StatusCode::CONFLICT,
            TemplateCacheError::Io { .. }
            | TemplateCacheError::Compile(_)
            | TemplateCacheError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the template cache.
pub type Result<T> = std::result::Result<T, TemplateCacheError>;
