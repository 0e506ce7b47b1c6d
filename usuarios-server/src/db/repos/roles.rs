//! Role repository

use sqlx::{FromRow, PgPool};

use crate::db::DbError;

/// Role record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Role {
    pub id_rol: i32,
    pub nombre: String,
}

/// Role repository
pub struct RoleRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> RoleRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All roles, ordered by `id_rol`.
    pub async fn list(&self) -> Result<Vec<Role>, DbError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT id_rol, nombre FROM rol ORDER BY id_rol ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(roles)
    }
}
