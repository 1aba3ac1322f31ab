//! marsh CLI — build and step a marsh sediment column stored on disk.
//!
//! ## Usage
//!
//! ```bash
//! # Seed a column from a constants file
//! marsh initialize --config data/morris_constants.toml --model-file column.json
//!
//! # Advance one year with 0.4 cm of sediment and a new surface biomass
//! marsh update --deposition 0.4 --biomass 0.05 --model-file column.json
//!
//! # Same, deriving surface biomass from a stem volume measurement
//! marsh update --deposition 0.4 --stem-volume 2.5 --model-file column.json
//!
//! # Print the layer table, newest first
//! marsh summary --model-file column.json
//! ```
//!
//! ## Exit Codes
//! - 0: success
//! - 1: any I/O, parse, or model validation error
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing::level_filters::LevelFilter;

use marsh_accretion::{
    accretion::{Measurement, SedimentCore},
    storage::{ColumnSnapshot, constants, snapshot},
};

#[derive(Parser)]
#[command(name = "marsh")]
#[command(version)]
#[command(about = "Layered marsh sediment accretion model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log step details
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a seed column from a constants file and save it
    Initialize {
        /// Constants file ([core], [layer], [stocks] tables)
        #[arg(long, short = 'c', default_value = "data/morris_constants.toml")]
        config: PathBuf,

        /// Where to write the column
        #[arg(long, short = 'm', default_value = "marsh_column.json")]
        model_file: PathBuf,

        /// Unit the inert pools are stored in
        #[arg(long, value_enum, default_value = "length")]
        measurement: MeasurementArg,
    },

    /// Load a column, apply one timestep, and save it
    Update {
        /// Sediment deposited this step (cm)
        #[arg(long, short = 'd', allow_hyphen_values = true)]
        deposition: f64,

        /// Surface biomass density (g/cm²); defaults to the current surface value
        #[arg(long, short = 'b')]
        biomass: Option<f64>,

        /// Stem volume, converted to surface biomass with sv_to_ro
        #[arg(long, conflicts_with = "biomass")]
        stem_volume: Option<f64>,

        /// Length of the step in years
        #[arg(long, short = 'y', default_value = "1.0")]
        years: f64,

        #[arg(long, short = 'm', default_value = "marsh_column.json")]
        model_file: PathBuf,
    },

    /// Print the layer table, newest layer first
    Summary {
        #[arg(long, short = 'm', default_value = "marsh_column.json")]
        model_file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MeasurementArg {
    Length,
    Weight,
}

impl From<MeasurementArg> for Measurement {
    fn from(arg: MeasurementArg) -> Self {
        match arg {
            MeasurementArg::Length => Measurement::Length,
            MeasurementArg::Weight => Measurement::Weight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else if cli.quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Commands::Initialize { config, model_file, measurement } => {
            initialize(&config, &model_file, measurement.into())
        }
        Commands::Update { deposition, biomass, stem_volume, years, model_file } => {
            update(&model_file, deposition, biomass, stem_volume, years)
        }
        Commands::Summary { model_file, format } => summary(&model_file, format),
    }
}

fn initialize(config: &Path, model_file: &Path, measurement: Measurement) -> Result<()> {
    let params = constants::load(config)
        .with_context(|| format!("loading constants from {}", config.display()))?;
    let core = SedimentCore::new(Arc::new(params), measurement)?;
    snapshot::save(&core, Some(config.to_path_buf()), model_file)
        .with_context(|| format!("writing column to {}", model_file.display()))?;

    let (top, bottom) = core.elevations();
    info!(
        model_file = %model_file.display(),
        top,
        bottom,
        %measurement,
        "initialized sediment column"
    );
    Ok(())
}

fn update(
    model_file: &Path, deposition: f64, biomass: Option<f64>, stem_volume: Option<f64>, years: f64,
) -> Result<()> {
    let stored = ColumnSnapshot::read(model_file)
        .with_context(|| format!("reading column from {}", model_file.display()))?;
    let source = stored.source.clone();
    let mut core = stored.restore()?;

    let biomass = match (biomass, stem_volume) {
        (Some(b), _) => b,
        (None, Some(volume)) => core.params().surface_biomass_from_stem_volume(volume)?,
        (None, None) => core.surface_biomass(),
    };
    let outcome = core
        .step_forward(biomass, deposition, years)
        .with_context(|| format!("stepping column with deposition {deposition} cm"))?;

    snapshot::save(&core, source, model_file)
        .with_context(|| format!("writing column to {}", model_file.display()))?;
    info!(
        layers = outcome.layer_count,
        surface = outcome.surface_elevation,
        total_biomass = outcome.total_biomass,
        "updated sediment column"
    );
    Ok(())
}

fn summary(model_file: &Path, format: OutputFormat) -> Result<()> {
    let core = snapshot::load(model_file)
        .with_context(|| format!("reading column from {}", model_file.display()))?;

    if format == OutputFormat::Json {
        let rows: Vec<_> = core.iter_top_down().collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let m = core.measurement();
    let unit = match m {
        Measurement::Length => "cm",
        Measurement::Weight => "g",
    };
    println!(
        "{:>5} {:>10} {:>10} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "layer", "top", "bottom", "depth", "biomass", "labile", "refractory", "inorganic"
    );
    for (i, row) in core.iter_top_down().enumerate() {
        println!(
            "{:>5} {:>10.3} {:>10.3} {:>8.2} {:>12.5} {:>12.5} {:>12.5} {:>12.5}",
            core.len() - 1 - i,
            row.top_elevation,
            row.bottom_elevation,
            row.top_depth,
            row.biomass.in_units(m),
            row.labile.in_units(m),
            row.refractory.in_units(m),
            row.inorganic.in_units(m),
        );
    }
    println!("pools in {unit}; root-zone biomass {:.5} {unit}", core.total_biomass());
    Ok(())
}
