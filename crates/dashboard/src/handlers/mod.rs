//! HTTP request handlers for the dashboard API.

pub mod docs;
pub mod seed;
pub mod stats;

// Re-export handlers (including utoipa __path types for OpenAPI)
pub use docs::openapi_json;
pub use seed::{__path_seed_database, SeedResponse, seed_database};
pub use stats::{__path_health_check, health_check};
