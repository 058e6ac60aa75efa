// ==============================================================================
// main.rs - Population Genetics Aggregator Entry Point
// ==============================================================================
// Description: Runs one aggregation and prints the result as JSON on stdout
// Created: 2026-10-18
// Modified: 2026-10-18
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use popgen_aggregator::{DatasetAggregator, DatasetConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Root of the pipeline output tree
    #[arg(short, long, env = "POPGEN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON dataset configuration file
    #[arg(short, long, env = "POPGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Chromosome label reported in dataset stats
    #[arg(long)]
    chromosome: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample, population and variant counts
    Stats,
    /// PCA coordinates (PC1-PC3) per sample
    Pca,
    /// Pairwise FST matrix and details
    Fst,
    /// Per-variant allele frequencies
    Af {
        /// Maximum number of variants to read
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Population registry metadata
    Populations,
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so stdout stays JSON)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "popgen_aggregator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DatasetConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => DatasetConfig::default(),
    };
    if let Some(dir) = args.data_dir {
        config.base_dir = dir;
    }
    if let Some(chromosome) = args.chromosome {
        config.chromosome = chromosome;
    }

    info!("Dataset root: {:?}", config.base_dir);
    let aggregator = DatasetAggregator::new(config);

    match args.command {
        Command::Stats => emit(
            &aggregator.stats().context("Failed to compute dataset stats")?,
            args.pretty,
        ),
        Command::Pca => emit(
            &aggregator.pca().context("Failed to load PCA data")?,
            args.pretty,
        ),
        Command::Fst => emit(
            &aggregator
                .differentiation()
                .context("Failed to load FST data")?,
            args.pretty,
        ),
        Command::Af { limit } => emit(
            &aggregator
                .allele_frequencies(limit)
                .context("Failed to load allele frequency data")?,
            args.pretty,
        ),
        Command::Populations => emit(&aggregator.populations(), args.pretty),
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
