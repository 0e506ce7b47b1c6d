//! Role endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Role;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Role response
#[derive(Serialize)]
pub struct RolResponse {
    pub id_rol: i32,
    pub nombre: String,
}

impl From<Role> for RolResponse {
    fn from(r: Role) -> Self {
        Self {
            id_rol: r.id_rol,
            nombre: r.nombre,
        }
    }
}

/// GET /roles - all roles ordered by id_rol
async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RolResponse>>, ApiError> {
    let roles = state
        .store
        .list_roles()
        .await
        .map_err(|e| ApiError::from_db(e, "Error al obtener los roles"))?;

    Ok(Json(roles.into_iter().map(RolResponse::from).collect()))
}

/// Role routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/roles", get(list_roles))
}
