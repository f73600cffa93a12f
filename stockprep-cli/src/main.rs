//! stockprep CLI: build feature frames and inspect train/validation splits.
//!
//! Commands:
//! - `features`: read OHLCV bars, apply the feature plan, write the frame
//! - `split`: build the windowed dataset and report the loader partitions

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockprep_core::data::{read_ohlcv, write_frame};
use stockprep_core::features::FeatureFrameBuilder;
use stockprep_core::frame::FeatureFrame;
use stockprep_core::loader::{stacked, BatchingDataLoader, Dataset, WindowDataset};
use stockprep_core::PipelineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stockprep",
    about = "stockprep CLI: OHLCV feature engineering and dataset splitting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the feature frame for one instrument and write it out.
    Features {
        /// OHLCV input (.csv or .parquet).
        #[arg(long)]
        input: PathBuf,

        /// Pipeline config (.toml or .json). Defaults to the built-in plan.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (.csv or .parquet).
        #[arg(long)]
        output: PathBuf,

        /// Instrument symbol. Defaults to the input file stem.
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Build the windowed dataset and print the train/validation summary as JSON.
    Split {
        /// OHLCV input (.csv or .parquet).
        #[arg(long)]
        input: PathBuf,

        /// Pipeline config (.toml or .json). Defaults to the built-in plan.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Instrument symbol. Defaults to the input file stem.
        #[arg(long)]
        symbol: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Features {
            input,
            config,
            output,
            symbol,
        } => run_features(&input, config.as_deref(), &output, symbol),
        Commands::Split {
            input,
            config,
            symbol,
        } => run_split(&input, config.as_deref(), symbol),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn build_frame(input: &Path, config: &PipelineConfig, symbol: Option<String>) -> Result<FeatureFrame> {
    let symbol = symbol.unwrap_or_else(|| {
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_uppercase()
    });

    let series = read_ohlcv(input, &symbol).with_context(|| format!("reading {}", input.display()))?;
    let builder = FeatureFrameBuilder::new(config.features.clone())?;
    let frame = builder
        .build(&series)
        .with_context(|| format!("building features for {symbol}"))?;

    tracing::info!(
        symbol = frame.symbol(),
        rows = frame.height(),
        columns = frame.width(),
        plan = %builder.plan().fingerprint(),
        "feature frame built"
    );
    Ok(frame)
}

fn run_features(input: &Path, config: Option<&Path>, output: &Path, symbol: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    let frame = build_frame(input, &config, symbol)?;

    write_frame(&frame, output).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Wrote {} rows x {} columns to {}",
        frame.height(),
        frame.width() + 1,
        output.display()
    );
    Ok(())
}

fn run_split(input: &Path, config: Option<&Path>, symbol: Option<String>) -> Result<()> {
    let config = load_config(config)?;
    let frame = build_frame(input, &config, symbol)?;

    let dataset = Arc::new(WindowDataset::new(&frame, &config.window).context("building window dataset")?);
    let train = BatchingDataLoader::new(Arc::clone(&dataset), &config.loader, stacked())
        .context("building loader")?;
    let valid = train.split_validation();
    let (row_start, row_end) = dataset.row_range();

    let summary = serde_json::json!({
        "symbol": frame.symbol(),
        "frame": {
            "rows": frame.height(),
            "columns": frame.width(),
        },
        "dataset": {
            "samples": dataset.len(),
            "seq_len": dataset.seq_len(),
            "n_features": dataset.n_features(),
            "label": dataset.label_name(),
            "rows": [row_start, row_end],
        },
        "loader": {
            "batch_size": config.loader.batch_size,
            "validation_split": config.loader.validation_split.to_string(),
            "shuffle": train.shuffle(),
            "shuffle_overridden": train.shuffle_overridden(),
        },
        "train": {
            "samples": train.n_samples(),
            "batches": train.len(),
        },
        "valid": valid.as_ref().map(|v| serde_json::json!({
            "samples": v.n_samples(),
            "batches": v.len(),
        })),
    });

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
