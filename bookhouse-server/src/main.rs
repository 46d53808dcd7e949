//! BookHouse catalog daemon.
//!
//! Opens (or creates) the catalog database, reconciles the seed dataset, and
//! serves the HTTP API.
//!
//! Usage:
//!   bookhouse --db bookhouse.db --bind 0.0.0.0:8080

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use bookhouse_seed::{reconcile, SeedDataset};
use bookhouse_server::build_router;
use bookhouse_store::CatalogStore;

#[derive(Parser, Debug)]
#[command(name = "bookhouse")]
#[command(about = "Multi-branch library catalog service")]
struct Args {
    /// Address to bind the HTTP API
    #[arg(long, default_value = "0.0.0.0:8080", env = "BOOKHOUSE_BIND")]
    bind: String,

    /// Path to the SQLite database file
    #[arg(long, default_value = "bookhouse.db", env = "BOOKHOUSE_DB")]
    db: PathBuf,

    /// JSON seed dataset to reconcile at startup instead of the built-in one
    #[arg(long, env = "BOOKHOUSE_SEED_FILE")]
    seed_file: Option<PathBuf>,

    /// Skip seed reconciliation at startup
    #[arg(long)]
    no_seed: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("BookHouse starting...");
    let store = CatalogStore::open(&args.db)
        .with_context(|| format!("opening catalog database at {}", args.db.display()))?;

    if args.no_seed {
        info!("seed reconciliation skipped");
    } else {
        let dataset = match &args.seed_file {
            Some(path) => SeedDataset::from_json_file(path)
                .with_context(|| format!("loading seed dataset from {}", path.display()))?,
            None => SeedDataset::builtin(),
        };
        reconcile(&store, &dataset).context("reconciling seed dataset")?;
    }

    let app = build_router(store);
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!("HTTP API listening on {}", args.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
