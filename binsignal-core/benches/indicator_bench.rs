//! Criterion benchmarks for the indicator frame and scorer.
//!
//! Benchmarks:
//! 1. Single indicators over growing series
//! 2. Full `IndicatorFrame` computation
//! 3. Frame + score for every strategy

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use binsignal_core::domain::{Candle, Instrument, Interval};
use binsignal_core::indicators::{compute, Indicator, IndicatorParams, Rsi, Vortex};
use binsignal_core::scoring::{SignalScorer, StrategyKind};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(n: usize) -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 1.1 + (i as f64 * 0.1).sin() * 0.01;
            let open = close - 0.0003;
            Candle {
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: close + 0.0015,
                low: open - 0.0015,
                close,
            }
        })
        .collect()
}

// ── 1. Single indicators ─────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    for bar_count in [100, 500, 1440] {
        let candles = make_candles(bar_count);
        group.bench_with_input(BenchmarkId::new("rsi_14", bar_count), &candles, |b, candles| {
            let rsi = Rsi::new(14);
            b.iter(|| black_box(rsi.compute(black_box(candles))));
        });
        group.bench_with_input(
            BenchmarkId::new("vortex_plus_14", bar_count),
            &candles,
            |b, candles| {
                let vi = Vortex::plus(14);
                b.iter(|| black_box(vi.compute(black_box(candles))));
            },
        );
    }
    group.finish();
}

// ── 2. Full frame ────────────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let params = IndicatorParams::default();
    for bar_count in [100, 500, 1440] {
        let candles = make_candles(bar_count);
        group.bench_with_input(BenchmarkId::new("compute", bar_count), &candles, |b, candles| {
            b.iter(|| black_box(compute(black_box(candles), &params)));
        });
    }
    group.finish();
}

// ── 3. Frame + score ─────────────────────────────────────────────────

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let candles = make_candles(500);
    let params = IndicatorParams::default();
    let instrument = Instrument::new("EURUSD=X", "EUR/USD").unwrap();
    for kind in StrategyKind::ALL {
        let scorer = SignalScorer::new(kind);
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let frame = compute(&candles, &params).unwrap();
                black_box(scorer.score(&frame, &instrument, Interval::OneMinute))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_indicators, bench_frame, bench_score);
criterion_main!(benches);
