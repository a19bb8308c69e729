//! Price History CLI — fetch and adjust commands.
//!
//! Commands:
//! - `fetch` — download daily history for catalog instruments and back-adjust it
//! - `adjust` — back-adjust a previously saved raw JSON dataset offline
//!
//! Data goes to stdout (or `--output`); logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use pricehistory_core::data::{RunMode, TracingProgress, TsetmcProvider};
use pricehistory_runner::{
    adjust_offline, load_raw_json, run, write_output, OutputFormat, RunConfig, RunOutput,
};

#[derive(Parser)]
#[command(
    name = "pricehistory",
    about = "Daily price history with dividend and split back-adjustment"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily history for catalog instruments and back-adjust it.
    Fetch {
        /// Symbols to fetch. Defaults to the whole catalog.
        symbols: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Instrument catalog CSV (overrides config).
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Concurrent fetch workers (overrides config).
        #[arg(long)]
        workers: Option<usize>,

        /// Instrument family: stock or option (overrides config).
        #[arg(long)]
        mode: Option<String>,

        /// Output format: json or csv.
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Back-adjust a raw JSON dataset without fetching.
    Adjust {
        /// Raw (or previously adjusted) JSON records.
        #[arg(long)]
        input: PathBuf,

        /// Output format: json or csv.
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            symbols,
            config,
            catalog,
            workers,
            mode,
            format,
            output,
        } => run_fetch(symbols, config, catalog, workers, mode, &format, output),
        Commands::Adjust {
            input,
            format,
            output,
        } => run_adjust(input, &format, output),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_fetch(
    symbols: Vec<String>,
    config_path: Option<PathBuf>,
    catalog: Option<PathBuf>,
    workers: Option<usize>,
    mode: Option<String>,
    format: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = parse_format(format)?;

    let mut config = match config_path {
        Some(path) => RunConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if let Some(catalog) = catalog {
        config.catalog_path = catalog;
    }
    if let Some(workers) = workers {
        config.max_workers = workers;
    }
    if let Some(mode) = mode {
        config.mode = RunMode::parse(&mode)
            .ok_or_else(|| anyhow!("unknown mode '{mode}' (expected stock or option)"))?;
    }

    let provider = TsetmcProvider::new(config.provider.to_settings())?;
    let out = run(&config, Some(symbols.as_slice()), &provider, &TracingProgress)?;
    emit(&out, format, output)
}

fn run_adjust(input: PathBuf, format: &str, output: Option<PathBuf>) -> Result<()> {
    let format = parse_format(format)?;
    let records = load_raw_json(&input)?;
    info!(records = records.len(), input = %input.display(), "loaded raw records");
    let out = adjust_offline(records)?;
    emit(&out, format, output)
}

fn parse_format(format: &str) -> Result<OutputFormat> {
    OutputFormat::parse(format)
        .ok_or_else(|| anyhow!("unknown format '{format}' (expected json or csv)"))
}

fn emit(out: &RunOutput, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let rendered = format.render(&out.records)?;
    write_output(output.as_deref(), &rendered)?;
    info!(
        records = out.summary.records,
        hash = %out.summary.dataset_hash,
        "wrote {:?} output",
        format
    );
    Ok(())
}
