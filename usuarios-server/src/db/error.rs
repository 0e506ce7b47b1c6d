//! Database error type

/// Errors surfaced by the store
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("email already registered: {gmail}")]
    DuplicateEmail { gmail: String },

    #[error("database unavailable")]
    Unavailable,
}

impl DbError {
    pub(crate) fn usuario_not_found(id: i32) -> Self {
        Self::NotFound {
            resource: "usuario",
            id: id.to_string(),
        }
    }

    /// Map a unique-constraint violation to [`DbError::DuplicateEmail`].
    pub(crate) fn from_insert(err: sqlx::Error, gmail: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateEmail {
                gmail: gmail.to_owned(),
            },
            _ => Self::Sqlx(err),
        }
    }
}
