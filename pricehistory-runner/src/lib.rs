//! Price History Runner — run orchestration on top of `pricehistory-core`.
//!
//! This crate provides:
//! - TOML run configuration with validation
//! - The fetch pipeline: catalog selection, bounded concurrent fetch,
//!   back-adjustment, run summary with a dataset fingerprint
//! - JSON and CSV export, and raw JSON import for offline re-adjustment

pub mod config;
pub mod export;
pub mod pipeline;

pub use config::{ConfigError, ProviderConfig, RunConfig};
pub use export::{
    export_csv, export_json, import_raw_json, load_raw_json, write_output, OutputFormat,
};
pub use pipeline::{
    adjust_offline, dataset_hash, fetch_all, run, run_entries, FetchOutcome, RunError, RunOutput,
    RunSummary,
};
