//! One-shot grid export.
//!
//! Builds the calibration grid for a single country and writes it as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use calibrator::config::Config;
use calibrator::grid::GridBuilder;
use calibrator::source::{GeometrySource, NaturalEarthSource};

#[derive(Parser, Debug)]
#[command(name = "grid-export")]
#[command(about = "Write the sampling grid for one country as JSON")]
struct Args {
    /// Country code (e.g. US, FR); ignored when --name is given
    #[arg(long)]
    country: Option<String>,

    /// Exact dataset country name, bypassing the code table
    #[arg(long)]
    name: Option<String>,

    /// Cell side length in dataset units
    #[arg(long)]
    cell_size: Option<f64>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Country boundary GeoJSON (overrides config)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    let country_name = match args.name {
        Some(name) => name,
        None => {
            let code = args
                .country
                .unwrap_or_else(|| config.defaults.country.clone());
            let table = config.country_table();
            if table.lookup(&code).is_none() {
                warn!(
                    "Unknown country code '{}', falling back to {}",
                    code,
                    table.default_name()
                );
            }
            table.resolve(&code).to_string()
        }
    };
    let cell_size = args.cell_size.unwrap_or(config.defaults.cell_size);

    let builder = GridBuilder::new(cell_size)?;

    let source = NaturalEarthSource::load(&config.dataset.path, &config.dataset.name_property)
        .context("Failed to load country boundaries")?;

    let country = source.resolve(&country_name);
    if country.is_empty() {
        warn!("'{}' not found in dataset, grid will be empty", country_name);
    }

    let max_cells = config.defaults.max_cells;
    match builder.candidate_count(&country.geometry) {
        Some(count) if count <= max_cells => {}
        Some(count) => anyhow::bail!(
            "Cell size {} yields {} candidate cells for {} (limit {}, see [defaults] max_cells)",
            builder.cell_size(),
            count,
            country_name,
            max_cells
        ),
        None => anyhow::bail!(
            "Cell size {} is too small for {}: candidate count overflows",
            builder.cell_size(),
            country_name
        ),
    }

    let grid = builder.build(&country.geometry);
    info!(
        "{}: {} cells at cell size {} ({})",
        country_name,
        grid.len(),
        builder.cell_size(),
        country.crs
    );

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &grid)?;
    } else {
        serde_json::to_writer(&mut writer, &grid)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Wrote {}", path.display());
    }

    Ok(())
}
