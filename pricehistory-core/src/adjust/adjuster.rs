//! Back-adjustment of one instrument's closing prices.
//!
//! The series is anchored on the most recent close and walked backward in
//! time. Every earlier day is rescaled by the compounded return between it
//! and the anchor, so jumps from splits, capital increases and dividend
//! resets vanish from ratios of adjusted prices.
//!
//! Degenerate inputs never fail:
//! - a missing (or zero) close counts as `0.0`
//! - a missing (or zero) previous close counts as [`PREV_CLOSE_EPSILON`]
//! - a zero cumulative factor yields an adjusted price of `0.0`

use crate::domain::{AdjustedRecord, RawRecord};

/// Stand-in denominator for a missing previous close.
pub const PREV_CLOSE_EPSILON: f64 = 1e-9;

/// Adjust one instrument's records. Returns them ascending by date.
///
/// All records must share an instrument id. Records sharing a date are
/// kept, in input order; their adjusted values are whatever the walk
/// produces for that order.
pub fn adjust_group(records: Vec<RawRecord>) -> Vec<AdjustedRecord> {
    let mut desc = records;
    desc.sort_by(|a, b| b.date.cmp(&a.date));

    let latest_close = match desc.first() {
        Some(latest) => close_or_zero(latest),
        None => return Vec::new(),
    };

    let mut running = 1.0;
    let factors: Vec<(f64, f64)> = desc
        .iter()
        .map(|record| {
            let ret = close_or_zero(record) / previous_close_or_epsilon(record);
            running *= ret;
            (ret, running)
        })
        .collect();

    // Unshifted price per row; row i ends up with the value of row i - 1.
    let unshifted: Vec<f64> = factors
        .iter()
        .map(|&(_, cumprod)| {
            if cumprod == 0.0 {
                0.0
            } else {
                latest_close / cumprod
            }
        })
        .collect();

    let mut out: Vec<AdjustedRecord> = desc
        .into_iter()
        .zip(factors)
        .enumerate()
        .map(|(i, (raw, (ret, cumprod)))| AdjustedRecord {
            raw,
            ret,
            cumprod,
            adj_price: if i == 0 { latest_close } else { unshifted[i - 1] },
        })
        .collect();

    out.sort_by_key(|r| r.raw.date);
    out
}

fn close_or_zero(record: &RawRecord) -> f64 {
    record.close.unwrap_or(0.0)
}

fn previous_close_or_epsilon(record: &RawRecord) -> f64 {
    record
        .previous_close
        .filter(|p| *p != 0.0)
        .unwrap_or(PREV_CLOSE_EPSILON)
}
