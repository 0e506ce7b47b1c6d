mod serve;
mod tracing_setup;

use anyhow::Result;
use clap::Parser;

use serve::{run_serve, ServeArgs};
use tracing_setup::TracingConfig;

/// HTTP API for user accounts and roles
#[derive(Parser, Debug)]
#[command(name = "usuarios", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    serve: ServeArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug })?;

    run_serve(cli.serve).await
}
