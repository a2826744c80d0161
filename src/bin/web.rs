//! bpbook web front end
//!
//! Run with: cargo run --bin bpbook-web
//!
//! # Configuration
//!
//! Reads the config file from `--config`, `~/.config/bpbook/config.toml` or
//! `./bpbook.toml`. Environment variables:
//! - `BPBOOK_DB_PATH`: Database file
//! - `BPBOOK_WEB_HOST`: Host to bind to (default: 127.0.0.1)
//! - `BPBOOK_WEB_PORT`: Port to listen on (default: 8085)
//! - `BPBOOK_LOG_LEVEL`, `BPBOOK_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Overrides the log level

use anyhow::Context;
use bpbook::app::{BookOptions, BpBook};
use bpbook::config::Config;
use bpbook::storage::SqliteStore;
use bpbook::web::{serve, AppState};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bpbook-web")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the blood pressure log in a browser")]
struct Args {
    /// Config file (default: search the usual locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file, overrides the configured path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Port, overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.web.port = port;
    }

    bpbook::logging::init(&config.logging);
    tracing::info!("Starting bpbook web v{}", env!("CARGO_PKG_VERSION"));

    let db_path = args.db.unwrap_or_else(|| config.db_path());
    tracing::info!("Database: {:?}", db_path);

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open database {:?}", db_path))?;
    let options = BookOptions::from_config(&config)?;
    let book = BpBook::open(Box::new(store), options);

    serve(AppState::new(book), &config.web).await?;

    tracing::info!("bpbook web stopped");
    Ok(())
}
