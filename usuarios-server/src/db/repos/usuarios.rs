//! User repository
//!
//! Handles user CRUD with:
//! - list/get: INNER JOIN on `rol` for the role name
//! - create/update: email pre-check and write in one transaction, serialized
//!   per email by `pg_advisory_xact_lock`
//! - delete: single `DELETE ... RETURNING`

use sqlx::{FromRow, PgConnection, PgPool};

use crate::db::DbError;
use crate::models::{NewUser, UserUpdate};

/// User joined with its role name. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub nombre: String,
    pub gmail: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
    pub rol: String,
}

/// Row returned by insert and update.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub nombre: String,
    pub gmail: String,
    pub estado: Option<bool>,
    pub id_rol: i32,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All users with their role name, ordered by id.
    pub async fn list(&self) -> Result<Vec<UserSummary>, DbError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT
                u.id,
                u.nombre,
                u.gmail,
                u.estado,
                u.id_rol,
                r.nombre AS rol
            FROM usuarios u
            INNER JOIN rol r ON u.id_rol = r.id_rol
            ORDER BY u.id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// A single user with its role name.
    pub async fn get(&self, id: i32) -> Result<UserSummary, DbError> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT
                u.id,
                u.nombre,
                u.gmail,
                u.estado,
                u.id_rol,
                r.nombre AS rol
            FROM usuarios u
            INNER JOIN rol r ON u.id_rol = r.id_rol
            WHERE u.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::usuario_not_found(id))
    }

    /// Insert a user unless the email is already taken (atomic).
    pub async fn create(&self, user: NewUser) -> Result<UserRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_email(&mut tx, &user.gmail).await?;

        let (taken,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM usuarios WHERE gmail = $1)")
                .bind(&user.gmail)
                .fetch_one(&mut *tx)
                .await?;

        if taken {
            return Err(DbError::DuplicateEmail { gmail: user.gmail });
        }

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO usuarios (nombre, gmail, contrasena, estado, id_rol)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, nombre, gmail, estado, id_rol
            "#,
        )
        .bind(&user.nombre)
        .bind(&user.gmail)
        .bind(&user.password_hash)
        .bind(user.estado)
        .bind(user.id_rol)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DbError::from_insert(e, &user.gmail))?;

        tx.commit().await?;
        Ok(record)
    }

    /// Replace a user's mutable fields unless another user owns the email.
    ///
    /// The email check runs first, so a taken email wins over a missing id.
    pub async fn update(&self, id: i32, user: UserUpdate) -> Result<UserRecord, DbError> {
        let mut tx = self.pool.begin().await?;

        lock_email(&mut tx, &user.gmail).await?;

        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM usuarios WHERE gmail = $1 AND id <> $2)",
        )
        .bind(&user.gmail)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if taken {
            return Err(DbError::DuplicateEmail { gmail: user.gmail });
        }

        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE usuarios
            SET nombre = $1,
                gmail = $2,
                contrasena = $3,
                id_rol = $4,
                estado = COALESCE($5, estado)
            WHERE id = $6
            RETURNING id, nombre, gmail, estado, id_rol
            "#,
        )
        .bind(&user.nombre)
        .bind(&user.gmail)
        .bind(&user.password_hash)
        .bind(user.id_rol)
        .bind(user.estado)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DbError::from_insert(e, &user.gmail))?
        .ok_or_else(|| DbError::usuario_not_found(id))?;

        tx.commit().await?;
        Ok(record)
    }

    /// Delete a user. One statement, so existence and removal are atomic.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i32>("DELETE FROM usuarios WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::usuario_not_found(id))?;

        Ok(())
    }
}

/// Serialize writers on the same email until the transaction ends.
async fn lock_email(conn: &mut PgConnection, gmail: &str) -> Result<(), DbError> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(gmail)
        .execute(conn)
        .await?;
    Ok(())
}
