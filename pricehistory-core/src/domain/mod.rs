//! Domain types for price history

pub mod date_key;
pub mod ids;
pub mod record;

pub use date_key::{DateKey, DateKeyError, JalaliDate};
pub use ids::InstrumentId;
pub use record::{AdjustedRecord, RawRecord};
