//! User endpoints
//!
//! Create and update validate the body before touching the store and hash
//! the password on the blocking pool. No response ever includes it.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{DbError, UserRecord, UserSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, UserId};
use crate::http::server::AppState;
use crate::models::{NewUser, UserUpdate, UsuarioPayload};
use crate::password::hash_password_blocking;

/// User with its role name
#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub id: i32,
    pub nombre: String,
    pub gmail: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
    pub rol: String,
}

impl From<UserSummary> for UsuarioResponse {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.id,
            nombre: u.nombre,
            gmail: u.gmail,
            estado: u.estado,
            id_rol: u.id_rol,
            rol: u.rol,
        }
    }
}

/// User as written by create/update
#[derive(Debug, Serialize)]
pub struct UsuarioGuardado {
    pub id: i32,
    pub nombre: String,
    pub gmail: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
}

impl From<UserRecord> for UsuarioGuardado {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            nombre: u.nombre,
            gmail: u.gmail,
            estado: u.estado,
            id_rol: u.id_rol,
        }
    }
}

/// Create/update response
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub mensaje: &'static str,
    pub usuario: UsuarioGuardado,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct MensajeResponse {
    pub mensaje: &'static str,
}

/// GET /usuarios - all users with role name, ordered by id
async fn list_usuarios(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UsuarioResponse>>, ApiError> {
    let users = state
        .store
        .list_users()
        .await
        .map_err(|e| ApiError::from_db(e, "Error al obtener los usuarios"))?;

    Ok(Json(users.into_iter().map(UsuarioResponse::from).collect()))
}

/// GET /usuarios/{id} - a single user
async fn get_usuario(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Json<UsuarioResponse>, ApiError> {
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Error al obtener usuario"))?;

    Ok(Json(UsuarioResponse::from(user)))
}

/// POST /usuarios - create a user; `estado` defaults to true
async fn create_usuario(
    State(state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<UsuarioPayload>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    const FAILURE: &str = "Error al agregar usuario";

    let fields = payload.validate()?;
    let password_hash = hash_password_blocking(fields.contrasena)
        .await
        .map_err(|e| ApiError::from_password(e, FAILURE))?;

    let user = state
        .store
        .create_user(NewUser {
            nombre: fields.nombre,
            gmail: fields.gmail,
            password_hash,
            estado: fields.estado.unwrap_or(true),
            id_rol: fields.id_rol,
        })
        .await
        .map_err(|e| ApiError::from_db(e, FAILURE))?;

    tracing::info!(id = user.id, id_rol = user.id_rol, "Usuario creado");

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            mensaje: "Usuario agregado correctamente",
            usuario: UsuarioGuardado::from(user),
        }),
    ))
}

/// PUT /usuarios/{id} - replace a user's fields
async fn update_usuario(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
    JsonBody(payload): JsonBody<UsuarioPayload>,
) -> Result<Json<MutationResponse>, ApiError> {
    const FAILURE: &str = "Error al actualizar usuario";

    let fields = payload.validate()?;
    let password_hash = hash_password_blocking(fields.contrasena)
        .await
        .map_err(|e| ApiError::from_password(e, FAILURE))?;

    let user = state
        .store
        .update_user(
            id,
            UserUpdate {
                nombre: fields.nombre,
                gmail: fields.gmail,
                password_hash,
                estado: fields.estado,
                id_rol: fields.id_rol,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::DuplicateEmail { .. } => ApiError::Conflict {
                message: "El correo ya está registrado por otro usuario",
            },
            e => ApiError::from_db(e, FAILURE),
        })?;

    tracing::info!(id = user.id, "Usuario actualizado");

    Ok(Json(MutationResponse {
        mensaje: "Usuario actualizado correctamente",
        usuario: UsuarioGuardado::from(user),
    }))
}

/// DELETE /usuarios/{id}
async fn delete_usuario(
    State(state): State<Arc<AppState>>,
    UserId(id): UserId,
) -> Result<Json<MensajeResponse>, ApiError> {
    state
        .store
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Error al eliminar usuario"))?;

    tracing::info!(id, "Usuario eliminado");

    Ok(Json(MensajeResponse {
        mensaje: "Usuario eliminado correctamente",
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usuarios", get(list_usuarios).post(create_usuario))
        .route(
            "/usuarios/{id}",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
}
