//! Run pipeline: catalog → concurrent fetch → back-adjustment.
//!
//! Fetches run on a dedicated rayon pool sized by `max_workers`, one task
//! per catalog entry. Results are collected in catalog order, so the raw
//! record stream (and therefore the dataset hash) does not depend on
//! which worker finished first.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use pricehistory_core::data::{
    fetch_or_empty, CatalogEntry, CatalogError, FetchProgress, InstrumentCatalog, RecordProvider,
    RunMode, SymbolFilter,
};
use pricehistory_core::{adjust_all, AdjustedRecord, RawRecord};

use crate::config::{ConfigError, RunConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to hash dataset: {0}")]
    Hash(#[from] serde_json::Error),
}

/// Raw records from one fetch pass, plus per-entry bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub records: Vec<RawRecord>,
    /// Entries rejected by the symbol filter; no request was made for them.
    pub skipped: usize,
    /// Entries whose fetch returned at least one record.
    pub with_data: usize,
}

/// Counts and fingerprint describing a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub requested: usize,
    pub skipped: usize,
    pub with_data: usize,
    pub records: usize,
    /// blake3 over the JSON encoding of the adjusted records, in output order.
    pub dataset_hash: String,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<AdjustedRecord>,
    pub summary: RunSummary,
}

/// Load the catalog named by `config`, select `symbols`, fetch and adjust.
///
/// `None` or an empty slice selects every catalog entry.
pub fn run(
    config: &RunConfig,
    symbols: Option<&[String]>,
    provider: &dyn RecordProvider,
    progress: &dyn FetchProgress,
) -> Result<RunOutput, RunError> {
    config.validate()?;
    let catalog = InstrumentCatalog::from_path(&config.catalog_path)?;
    let entries = catalog.select(symbols);
    info!(
        catalog = catalog.len(),
        selected = entries.len(),
        mode = ?config.mode,
        provider = provider.name(),
        "starting run"
    );
    run_entries(&entries, provider, config.mode, config.max_workers, progress)
}

/// Fetch and adjust an explicit entry list.
pub fn run_entries(
    entries: &[CatalogEntry],
    provider: &dyn RecordProvider,
    mode: RunMode,
    max_workers: usize,
    progress: &dyn FetchProgress,
) -> Result<RunOutput, RunError> {
    let pool = build_pool(max_workers)?;
    let fetched = fetch_on(&pool, provider, entries, mode, progress);
    let records = pool.install(|| adjust_all(fetched.records));

    let summary = RunSummary {
        requested: entries.len(),
        skipped: fetched.skipped,
        with_data: fetched.with_data,
        records: records.len(),
        dataset_hash: dataset_hash(&records)?,
    };
    info!(
        records = summary.records,
        with_data = summary.with_data,
        skipped = summary.skipped,
        hash = %summary.dataset_hash,
        "run complete"
    );
    Ok(RunOutput { records, summary })
}

/// Adjust records loaded from a previous fetch, without touching the network.
pub fn adjust_offline(records: Vec<RawRecord>) -> Result<RunOutput, RunError> {
    let mut ids: Vec<&str> = records.iter().map(|r| r.instrument_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    let instruments = ids.len();

    let records = adjust_all(records);
    let summary = RunSummary {
        requested: instruments,
        skipped: 0,
        with_data: instruments,
        records: records.len(),
        dataset_hash: dataset_hash(&records)?,
    };
    Ok(RunOutput { records, summary })
}

/// Fetch every admitted entry on a pool of `max_workers` threads.
///
/// A failing entry contributes nothing; the others are unaffected.
pub fn fetch_all(
    provider: &dyn RecordProvider,
    entries: &[CatalogEntry],
    mode: RunMode,
    max_workers: usize,
    progress: &dyn FetchProgress,
) -> Result<FetchOutcome, RunError> {
    let pool = build_pool(max_workers)?;
    Ok(fetch_on(&pool, provider, entries, mode, progress))
}

fn build_pool(max_workers: usize) -> Result<rayon::ThreadPool, RunError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers.max(1))
        .thread_name(|i| format!("fetch-{i}"))
        .build()?;
    Ok(pool)
}

fn fetch_on(
    pool: &rayon::ThreadPool,
    provider: &dyn RecordProvider,
    entries: &[CatalogEntry],
    mode: RunMode,
    progress: &dyn FetchProgress,
) -> FetchOutcome {
    let filter = SymbolFilter::DEFAULT;
    let total = entries.len();

    let per_entry: Vec<Option<Vec<RawRecord>>> = pool.install(|| {
        entries
            .par_iter()
            .enumerate()
            .map(|(index, entry)| {
                if !filter.admits(&entry.symbol, mode) {
                    debug!(symbol = %entry.symbol, "excluded by symbol filter");
                    return None;
                }
                let records = fetch_or_empty(provider, entry);
                progress.on_complete(entry, index, total, records.len());
                Some(records)
            })
            .collect()
    });

    let mut outcome = FetchOutcome::default();
    for result in per_entry {
        match result {
            None => outcome.skipped += 1,
            Some(records) => {
                if !records.is_empty() {
                    outcome.with_data += 1;
                }
                outcome.records.extend(records);
            }
        }
    }
    progress.on_batch_complete(outcome.with_data, total - outcome.skipped, outcome.skipped);
    outcome
}

/// Deterministic fingerprint of an adjusted dataset.
pub fn dataset_hash(records: &[AdjustedRecord]) -> Result<String, serde_json::Error> {
    let mut hasher = blake3::Hasher::new();
    for record in records {
        serde_json::to_writer(&mut hasher, record)?;
        hasher.update(b"\n");
    }
    Ok(hasher.finalize().to_hex().to_string())
}
