//! Instrument catalog — display symbol to provider id.
//!
//! The catalog is a CSV file with at least `symbol` and `id` columns;
//! extra columns are ignored. Row order is kept so selections come back
//! in a stable, reproducible order.

use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::domain::InstrumentId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse catalog: {0}")]
    Csv(#[from] csv::Error),
}

/// One `(symbol, id)` pair from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub symbol: String,
    pub id: InstrumentId,
}

impl CatalogEntry {
    pub fn new(symbol: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            id: InstrumentId::new(id),
        }
    }
}

/// The full list of known instruments.
#[derive(Debug, Clone, Default)]
pub struct InstrumentCatalog {
    entries: Vec<CatalogEntry>,
}

impl InstrumentCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Load a catalog from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a catalog from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let entries = rdr
            .deserialize::<CatalogEntry>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose symbol is in `symbols`, in catalog order.
    ///
    /// `None` or an empty list selects the whole catalog. A symbol listed
    /// more than once in the catalog selects every matching row.
    pub fn select(&self, symbols: Option<&[String]>) -> Vec<CatalogEntry> {
        match symbols {
            Some(wanted) if !wanted.is_empty() => self
                .entries
                .iter()
                .filter(|e| wanted.iter().any(|s| s == &e.symbol))
                .cloned()
                .collect(),
            _ => self.entries.clone(),
        }
    }
}
