//! snowlens - Warehouse activity, cost, lineage and access dashboard API
//!
//! This is the main entry point for the `snowlens` binary.

use anyhow::Result;
use clap::Parser;
use sl_cli::Cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // RUST_LOG wins, then --verbose, then the configured level
    let fallback = if cli.verbose {
        "debug".to_string()
    } else {
        config.global.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let json_logs = config.global.json_logs;
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json()))
        .with((!json_logs).then(fmt::layer))
        .with(filter)
        .init();

    cli.run(config).await?;

    Ok(())
}
