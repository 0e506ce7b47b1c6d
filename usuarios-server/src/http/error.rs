//! API error types with IntoResponse
//!
//! Errors are converted to `{"mensaje": ...}` JSON bodies. Store and
//! internal failures are logged here and reach the client only as the
//! handler's generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::ValidationError;
use crate::password::PasswordError;

pub const USUARIO_NO_ENCONTRADO: &str = "Usuario no encontrado";
pub const BASE_NO_DISPONIBLE: &str = "Base de datos no disponible";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing field, bad id or bad body (400)
    Validation(ValidationError),

    /// Email already registered (400)
    Conflict { message: &'static str },

    /// Resource not found (404)
    NotFound { message: &'static str },

    /// Store disconnected (503)
    Unavailable,

    /// Store error (500, logged)
    Database { message: &'static str, source: DbError },

    /// Anything else (500, logged)
    Internal { message: &'static str, detail: String },
}

impl ApiError {
    /// Map a store error, using `message` as the client-facing 500 text.
    ///
    /// Duplicate emails map to the create-path conflict message; the update
    /// handler overrides it.
    pub fn from_db(err: DbError, message: &'static str) -> Self {
        match err {
            DbError::NotFound { .. } => Self::NotFound {
                message: USUARIO_NO_ENCONTRADO,
            },
            DbError::DuplicateEmail { .. } => Self::Conflict {
                message: "El correo ya está registrado.",
            },
            DbError::Unavailable => Self::Unavailable,
            source @ DbError::Sqlx(_) => Self::Database { message, source },
        }
    }

    pub fn from_password(err: PasswordError, message: &'static str) -> Self {
        Self::Internal {
            message,
            detail: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Validation(e) => match e.field() {
                Some(campo) => json!({ "mensaje": e.to_string(), "campo": campo }),
                None => json!({ "mensaje": e.to_string() }),
            },
            Self::Conflict { message } | Self::NotFound { message } => {
                json!({ "mensaje": message })
            }
            Self::Unavailable => json!({ "mensaje": BASE_NO_DISPONIBLE }),
            Self::Database { message, source } => {
                // Log the actual error, return generic message
                tracing::error!(error = %source, "{}", message);
                json!({ "mensaje": message })
            }
            Self::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                json!({ "mensaje": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_with_field() {
        let response = ApiError::Validation(ValidationError::Missing { field: "gmail" }).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["mensaje"], "Todos los campos son obligatorios");
        assert_eq!(body["campo"], "gmail");
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::from_db(DbError::usuario_not_found(3), "Error al obtener usuario");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["mensaje"], USUARIO_NO_ENCONTRADO);
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let err = ApiError::from_db(
            DbError::Sqlx(sqlx::Error::Protocol("secret detail".into())),
            "Error al obtener los roles",
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["mensaje"], "Error al obtener los roles");
        assert!(!body.to_string().contains("secret detail"));
    }

    #[test]
    fn unavailable_is_503() {
        assert_eq!(
            ApiError::from_db(DbError::Unavailable, "x").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn duplicate_email_is_400() {
        let err = ApiError::from_db(
            DbError::DuplicateEmail {
                gmail: "ana@x.com".into(),
            },
            "x",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
