//! Connection provider
//!
//! Holds the one sqlx PgPool shared by every handler. The provider starts
//! disconnected; [`Database::connect`] moves it to ready. A failed connect is
//! logged and leaves it disconnected, which the router reports as 503.

use std::fmt;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tokio::sync::OnceCell;

use super::DbError;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long to wait for the first connection before giving up.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for the relational store
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "Prueba".to_string(),
            user: "victor".to_string(),
            password: "after dark".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// Manual impl keeps the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Shared handle to PostgreSQL with an explicit readiness state
pub struct Database {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl Database {
    /// Create a disconnected provider. No I/O happens until [`connect`](Self::connect).
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Wrap an already-open pool. The provider is ready immediately.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            config: DatabaseConfig::default(),
            pool: OnceCell::new_with(Some(pool)),
        }
    }

    /// Open the pool.
    ///
    /// # Errors
    ///
    /// Returns the driver error if the first connection cannot be
    /// established. The provider stays disconnected in that case.
    pub async fn connect(&self) -> Result<(), DbError> {
        if self.pool.initialized() {
            return Ok(());
        }

        let result = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.connect_timeout)
            .connect_with(self.config.connect_options())
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(
                    host = %self.config.host,
                    port = self.config.port,
                    database = %self.config.database,
                    "Connected to PostgreSQL"
                );
                // A concurrent connect may have won; its pool is equivalent.
                let _ = self.pool.set(pool);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    host = %self.config.host,
                    port = self.config.port,
                    database = %self.config.database,
                    error = %e,
                    "PostgreSQL connection failed"
                );
                Err(DbError::Sqlx(e))
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.pool.initialized()
    }

    /// The live pool, or [`DbError::Unavailable`] while disconnected.
    pub fn pool(&self) -> Result<&PgPool, DbError> {
        self.pool.get().ok_or(DbError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_deployment() {
        let config = DatabaseConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "Prueba");
        assert_eq!(config.user, "victor");
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", DatabaseConfig::default());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("after dark"));
    }

    #[test]
    fn starts_disconnected() {
        let db = Database::new(DatabaseConfig::default());
        assert!(!db.is_ready());
        assert!(matches!(db.pool(), Err(DbError::Unavailable)));
    }

    #[tokio::test]
    async fn failed_connect_stays_disconnected() {
        let db = Database::new(DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            connect_timeout: Duration::from_millis(500),
            ..DatabaseConfig::default()
        });

        assert!(db.connect().await.is_err());
        assert!(!db.is_ready());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p usuarios-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        let db = Database::from_pool(pool);
        assert!(db.is_ready());

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(db.pool().unwrap())
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
