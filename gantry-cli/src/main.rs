//! Gantry benchmark runner
//!
//! Wires configuration, corpus, lifecycle manager, seeder and the selected
//! load engine into a [`RunContext`], hands it to the controller, and
//! flushes the accumulated results as one CSV table.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gantry_config::{ConfigLoader, EngineKind};
use gantry_core::{load_corpus, write_results, ProductRecord};
use gantry_lifecycle::ComposeLifecycle;
use gantry_loadgen::{InProcessEngine, LoadEngine, WrkEngine};
use gantry_storage::PgStore;

mod context;
mod controller;

use context::RunContext;

#[derive(Parser)]
#[command(name = "gantry", version, about = "HTTP framework benchmark harness")]
struct Cli {
    /// Optional YAML configuration file; GANTRY_* environment variables
    /// override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Product corpus CSV
    #[arg(long, default_value = "data/products.csv")]
    corpus: PathBuf,

    /// Log filter, e.g. "info" or "gantry=debug"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Best-effort: a missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = ConfigLoader::new()
        .load(cli.config.as_ref())
        .context("Failed to load configuration")?;

    // The one fatal setup error: no valid run exists without the corpus.
    let corpus: Arc<[ProductRecord]> = load_corpus(&cli.corpus)
        .context("Failed to load product corpus")?
        .into();

    let lifecycle = Arc::new(ComposeLifecycle::new(&config.services)?);
    let store = Arc::new(PgStore::new(config.database.clone()));
    let engine: Arc<dyn LoadEngine> = match config.load.engine {
        EngineKind::InProcess => Arc::new(
            InProcessEngine::new(&config.load, corpus.clone())
                .context("Failed to build load engine")?,
        ),
        EngineKind::Wrk => Arc::new(WrkEngine::new(config.wrk.clone())),
    };
    info!("Using the {} load engine", config.load.engine);

    let ctx = RunContext {
        config,
        corpus,
        lifecycle,
        store,
        engine,
    };
    let results = controller::run(&ctx).await;

    let path = write_results(&ctx.config.output.path, &results)
        .context("Failed to write results table")?;
    info!(
        "Benchmarking complete: {} rows saved to {}",
        results.len(),
        path.display()
    );
    Ok(())
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
