//! Readiness gate for `/api`
//!
//! While the store is disconnected every API request is answered with 503
//! before reaching a handler.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::ApiError;
use super::server::AppState;

pub async fn require_ready(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.store.is_ready() {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejecting request: database unavailable"
        );
        return ApiError::Unavailable.into_response();
    }

    next.run(request).await
}
