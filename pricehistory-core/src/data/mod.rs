//! Data boundary: instrument catalog, symbol filter and record providers

pub mod catalog;
pub mod filter;
pub mod provider;
pub mod tsetmc;

pub use catalog::{CatalogEntry, CatalogError, InstrumentCatalog};
pub use filter::{RunMode, SymbolFilter};
pub use provider::{
    fetch_or_empty, FetchError, FetchProgress, RecordProvider, SilentProgress, TracingProgress,
};
pub use tsetmc::{TsetmcProvider, TsetmcSettings};
