//! HTTP server layer
//!
//! Axum server with:
//! - Injected store (`Arc<dyn Store>`)
//! - Readiness gate returning 503 while the database is down
//! - Request tracing and permissive CORS
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod readiness;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
