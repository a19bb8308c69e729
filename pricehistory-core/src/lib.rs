//! Price History Core — record types, back-adjustment, provider boundary.
//!
//! This crate contains:
//! - Domain types (instrument ids, trading-day keys, raw and adjusted records)
//! - The back-adjustment pipeline: group by instrument, adjust, aggregate
//! - The data boundary: instrument catalog, symbol filter, record providers
//!
//! Everything after the provider boundary is pure and infallible: fetch
//! failures arrive as empty record sets, and degenerate prices fall back
//! to fixed constants instead of erroring.

pub mod adjust;
pub mod data;
pub mod domain;

pub use adjust::{adjust_all, adjust_group, aggregate, group_by_instrument};
pub use domain::{AdjustedRecord, DateKey, InstrumentId, RawRecord};
