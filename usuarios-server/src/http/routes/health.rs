//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// GET /health - never gated, reports database readiness
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ready = state.store.is_ready();
    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: if ready { "connected" } else { "disconnected" },
    })
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn health_reports_readiness() {
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState {
            store: store.clone(),
        });

        let Json(body) = health(State(state.clone())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, "connected");

        store.set_ready(false);
        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "disconnected");
    }
}
