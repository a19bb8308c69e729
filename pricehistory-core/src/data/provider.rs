//! Record provider trait and structured error types.
//!
//! The RecordProvider trait abstracts over data sources so the pipeline
//! can run against the live exchange feed or an in-process mock. Fetch
//! failures stop at [`fetch_or_empty`]: past that point an instrument
//! either has records or it has none.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalog::CatalogEntry;
use crate::domain::RawRecord;

/// Structured error types for a single instrument fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for instrument {id}")]
    HttpStatus { id: String, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// Trait for daily price record providers.
///
/// Implementations return records in whatever order the source delivers
/// them; nothing downstream relies on that order.
pub trait RecordProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch every daily record the source holds for one instrument.
    fn fetch(&self, entry: &CatalogEntry) -> Result<Vec<RawRecord>, FetchError>;
}

/// Fetch one instrument, converting any failure into zero records.
pub fn fetch_or_empty(provider: &dyn RecordProvider, entry: &CatalogEntry) -> Vec<RawRecord> {
    match provider.fetch(entry) {
        Ok(records) => {
            debug!(
                provider = provider.name(),
                symbol = %entry.symbol,
                id = %entry.id,
                records = records.len(),
                "fetched"
            );
            records
        }
        Err(e) => {
            warn!(
                provider = provider.name(),
                symbol = %entry.symbol,
                id = %entry.id,
                error = %e,
                "fetch failed, treating instrument as empty"
            );
            Vec::new()
        }
    }
}

/// Progress callback for multi-instrument fetches.
pub trait FetchProgress: Send + Sync {
    /// Called when an instrument fetch completes (successfully or not).
    fn on_complete(&self, entry: &CatalogEntry, index: usize, total: usize, records: usize);

    /// Called when the entire batch is done. `fetched` counts the entries
    /// that were requested; `skipped` the ones the symbol filter rejected.
    fn on_batch_complete(&self, with_data: usize, fetched: usize, skipped: usize);
}

/// Progress reporter that emits `tracing` events.
pub struct TracingProgress;

impl FetchProgress for TracingProgress {
    fn on_complete(&self, entry: &CatalogEntry, index: usize, total: usize, records: usize) {
        info!(
            "[{}/{}] {} ({}): {} records",
            index + 1,
            total,
            entry.symbol,
            entry.id,
            records
        );
    }

    fn on_batch_complete(&self, with_data: usize, fetched: usize, skipped: usize) {
        info!(
            "fetch complete: {with_data}/{fetched} instruments returned data, {skipped} skipped by filter"
        );
    }
}

/// Progress reporter that reports nothing.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_complete(&self, _entry: &CatalogEntry, _index: usize, _total: usize, _records: usize) {}

    fn on_batch_complete(&self, _with_data: usize, _fetched: usize, _skipped: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DateKey, InstrumentId};

    struct FixedProvider {
        result: fn() -> Result<Vec<RawRecord>, FetchError>,
    }

    impl RecordProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fetch(&self, _entry: &CatalogEntry) -> Result<Vec<RawRecord>, FetchError> {
            (self.result)()
        }
    }

    fn entry() -> CatalogEntry {
        CatalogEntry::new("FOLD", "46348559193224090")
    }

    #[test]
    fn ok_passes_records_through() {
        let provider = FixedProvider {
            result: || {
                Ok(vec![RawRecord::new(
                    "FOLD",
                    InstrumentId::new("46348559193224090"),
                    DateKey::new(20230101).unwrap(),
                    Some(1.0),
                    Some(1.0),
                )])
            },
        };
        assert_eq!(fetch_or_empty(&provider, &entry()).len(), 1);
    }

    #[test]
    fn error_degrades_to_empty() {
        let provider = FixedProvider {
            result: || Err(FetchError::NetworkUnreachable("timed out".into())),
        };
        assert!(fetch_or_empty(&provider, &entry()).is_empty());
    }

    #[test]
    fn error_display() {
        let e = FetchError::HttpStatus {
            id: "42".into(),
            status: 503,
        };
        assert_eq!(e.to_string(), "HTTP 503 for instrument 42");
    }

    #[test]
    fn provider_is_object_safe_via_box() {
        let _p: Box<dyn RecordProvider> = Box::new(FixedProvider {
            result: || Ok(Vec::new()),
        });
    }
}
