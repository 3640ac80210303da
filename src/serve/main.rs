//! Calibration grid server.
//!
//! Loads the country boundary dataset once and serves grid requests over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use calibrator::api::{build_router, AppState};
use calibrator::config::Config;
use calibrator::source::NaturalEarthSource;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "calibrator")]
#[command(about = "Country sampling grid server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Country boundary GeoJSON (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    info!("Calibrator Server");

    let source = NaturalEarthSource::load(&config.dataset.path, &config.dataset.name_property)
        .context("Failed to load country boundaries")?;
    if source.is_empty() {
        anyhow::bail!(
            "No country boundaries found in {}",
            config.dataset.path.display()
        );
    }

    let countries = config.country_table();
    for (code, name) in countries.entries() {
        if !source.contains(name) {
            warn!("Country '{}' ({}) is not in the dataset", name, code);
        }
    }

    let state = Arc::new(AppState::new(
        Arc::new(source),
        countries,
        config.defaults.clone(),
    ));

    let app = build_router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    axum::serve(listener, app).await?;

    Ok(())
}
