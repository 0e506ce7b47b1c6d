//! Serve command: connect to PostgreSQL and run the HTTP API
//!
//! Every flag falls back to an environment variable and then to the
//! deployment default, so a bare `usuarios` runs the stock setup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use usuarios_server::{run_server, Database, DatabaseConfig, ServerConfig};

/// Arguments for the server
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "USUARIOS_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Directory with static assets served for unmatched paths
    #[arg(long, env = "USUARIOS_STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Database host
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "PGDATABASE", default_value = "Prueba")]
    pub db_name: String,

    /// Database user
    #[arg(long, env = "PGUSER", default_value = "victor")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", default_value = "after dark", hide_default_value = true, hide_env_values = true)]
    pub db_password: String,
}

impl ServeArgs {
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            ..DatabaseConfig::default()
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            static_dir: self.static_dir.clone(),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting usuarios server on {}", args.bind);

    let database = Arc::new(Database::new(args.database_config()));

    // A failed connect is already logged; the API answers 503 until restart.
    if database.connect().await.is_err() {
        tracing::warn!("Database unavailable, /api will respond 503");
    }

    run_server(database, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
