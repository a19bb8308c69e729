//! Grouping, back-adjustment and aggregation of raw price records.
//!
//! Pipeline: [`group_by_instrument`] → [`adjust_group`] per instrument →
//! [`aggregate`]. Groups share no data, so they are adjusted in parallel
//! on whatever rayon pool the caller is running in.

pub mod adjuster;
pub mod aggregate;
pub mod group;

pub use adjuster::{adjust_group, PREV_CLOSE_EPSILON};
pub use aggregate::{aggregate, sort_adjusted};
pub use group::group_by_instrument;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{AdjustedRecord, RawRecord};

/// Adjust a flat, unordered collection of raw records from any number of
/// instruments. Output is sorted by `(id, date)`.
pub fn adjust_all(records: Vec<RawRecord>) -> Vec<AdjustedRecord> {
    if records.is_empty() {
        return Vec::new();
    }

    let total = records.len();
    let groups: Vec<Vec<RawRecord>> = group_by_instrument(records).into_values().collect();
    let instruments = groups.len();

    let adjusted: Vec<Vec<AdjustedRecord>> =
        groups.into_par_iter().map(adjust_group).collect();

    debug!(records = total, instruments, "adjusted price history");
    aggregate(adjusted)
}
