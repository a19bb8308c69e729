//! Criterion benchmarks for the adjustment hot path.
//!
//! Benchmarks:
//! 1. Single-instrument back-adjustment at several history lengths
//! 2. Full group → adjust → aggregate over a multi-instrument batch

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use pricehistory_core::{adjust_all, adjust_group, DateKey, InstrumentId, RawRecord};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_records(id: &str, n: usize) -> Vec<RawRecord> {
    let base = NaiveDate::from_ymd_opt(2005, 1, 1).unwrap();
    let mut prev = 1000.0;
    (0..n)
        .map(|i| {
            let close = 1000.0 + (i as f64 * 0.05).sin() * 100.0;
            // A capital increase every ~250 sessions.
            let reference = if i % 250 == 249 { prev * 0.6 } else { prev };
            prev = close;
            RawRecord::new(
                "BENCH",
                InstrumentId::new(id),
                DateKey::try_from(base + Duration::days(i as i64)).unwrap(),
                Some(close),
                Some(reference),
            )
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_adjust_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust_group");
    for n in [250usize, 2_500, 5_000] {
        let records = make_records("1", n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| adjust_group(black_box(records.clone())))
        });
    }
    group.finish();
}

fn bench_adjust_all(c: &mut Criterion) {
    let records: Vec<RawRecord> = (0..200)
        .flat_map(|i| make_records(&i.to_string(), 2_500))
        .collect();
    c.bench_function("adjust_all/200x2500", |b| {
        b.iter(|| adjust_all(black_box(records.clone())))
    });
}

criterion_group!(benches, bench_adjust_group, bench_adjust_all);
criterion_main!(benches);
