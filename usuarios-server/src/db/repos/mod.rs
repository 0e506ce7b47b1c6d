//! Repository implementations for database access
//!
//! Each repository borrows the pool and follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Serializes check-then-write on the same email with an advisory lock
//! - Uses transactions for multi-step operations

pub mod roles;
pub mod usuarios;

pub use roles::{Role, RoleRepo};
pub use usuarios::{UserRecord, UserRepo, UserSummary};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicU32, Ordering};

    use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
    use sqlx::PgPool;

    const USUARIOS_DDL: &str = "(
        id SERIAL PRIMARY KEY,
        nombre TEXT NOT NULL,
        gmail TEXT NOT NULL,
        contrasena TEXT NOT NULL,
        estado BOOLEAN DEFAULT TRUE,
        id_rol INTEGER NOT NULL REFERENCES rol (id_rol)";

    const SEED_ROLES: &str =
        "INSERT INTO rol (id_rol, nombre) VALUES (2, 'Vendedor'), (1, 'Administrador')";

    fn database_url() -> String {
        std::env::var("DATABASE_URL").expect("DATABASE_URL required")
    }

    async fn run_all(pool: &PgPool, statements: &[String]) {
        for statement in statements {
            sqlx::query(statement)
                .execute(pool)
                .await
                .expect("test schema setup failed");
        }
    }

    /// Single-connection pool with session-local copies of both tables.
    ///
    /// Temp tables shadow any real `rol`/`usuarios`, so tests never touch
    /// live rows. Requires `DATABASE_URL`.
    pub async fn temp_schema_pool() -> PgPool {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&database_url())
            .await
            .expect("pool creation failed");

        run_all(
            &pool,
            &[
                "CREATE TEMP TABLE rol (id_rol INTEGER PRIMARY KEY, nombre TEXT NOT NULL)".to_string(),
                format!("CREATE TEMP TABLE usuarios {USUARIOS_DDL})"),
                SEED_ROLES.to_string(),
            ],
        )
        .await;

        pool
    }

    /// Multi-connection pool pinned to a fresh schema via `search_path`.
    ///
    /// Unlike [`temp_schema_pool`], every connection sees the same tables,
    /// so concurrent writers really race. With `unique_gmail` the table also
    /// declares `UNIQUE (gmail)`. Drop the schema with [`drop_schema`].
    pub async fn shared_schema_pool(max_connections: u32, unique_gmail: bool) -> (PgPool, String) {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        let schema = format!(
            "usuarios_test_{}_{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgPool::connect(&database_url())
            .await
            .expect("pool creation failed");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("schema creation failed");
        admin.close().await;

        let options: PgConnectOptions = database_url()
            .parse::<PgConnectOptions>()
            .expect("invalid DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .expect("pool creation failed");

        let unique = if unique_gmail { ", UNIQUE (gmail)" } else { "" };
        run_all(
            &pool,
            &[
                "CREATE TABLE rol (id_rol INTEGER PRIMARY KEY, nombre TEXT NOT NULL)".to_string(),
                format!("CREATE TABLE usuarios {USUARIOS_DDL}{unique})"),
                SEED_ROLES.to_string(),
            ],
        )
        .await;

        (pool, schema)
    }

    pub async fn drop_schema(pool: PgPool, schema: &str) {
        sqlx::query(&format!("DROP SCHEMA {schema} CASCADE"))
            .execute(&pool)
            .await
            .expect("schema cleanup failed");
        pool.close().await;
    }
}
