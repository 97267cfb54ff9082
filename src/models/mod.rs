//! Response models for the template cache API
//!
//! DTOs serialized into HTTP response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{EvictResponse, FreshResponse, HealthResponse, RawResponse, StatsResponse};
