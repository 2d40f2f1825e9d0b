//! Property tests for indicator and scoring invariants.
//!
//! Uses proptest to verify:
//! 1. RSI is always within [0, 100] once defined
//! 2. Vortex lines are finite and non-negative after warm-up
//! 3. Strength is never negative; CALL iff the signed score is positive
//! 4. Scoring is deterministic

use binsignal_core::domain::{Candle, Direction, Instrument, Interval};
use binsignal_core::indicators::{compute, Indicator, IndicatorParams, Rsi, Vortex};
use binsignal_core::scoring::{score_rows, SignalScorer, StrategyKind};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Random walk of 30..120 candles with positive prices and sane wicks.
fn arb_candles() -> impl Strategy<Value = Vec<Candle>> {
    (
        0.5..2.0_f64,
        prop::collection::vec((-0.01..0.01_f64, 0.0..0.005_f64, 0.0..0.005_f64), 30..120),
    )
        .prop_map(|(start, steps)| {
            let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
            let mut prev = start;
            steps
                .into_iter()
                .enumerate()
                .map(|(i, (step, up, down))| {
                    let close = (prev * (1.0 + step)).max(0.01);
                    let open = prev;
                    prev = close;
                    Candle {
                        timestamp: base + chrono::Duration::minutes(i as i64),
                        open,
                        high: open.max(close) + up,
                        low: (open.min(close) - down).max(0.001),
                        close,
                    }
                })
                .collect()
        })
}

fn arb_strategy() -> impl Strategy<Value = StrategyKind> {
    prop::sample::select(StrategyKind::ALL.to_vec())
}

fn instrument() -> Instrument {
    Instrument::new("EURUSD=X", "EUR/USD").unwrap()
}

// ── 1. RSI range ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_within_bounds(candles in arb_candles(), period in 2usize..30) {
        for v in Rsi::new(period).compute(&candles) {
            prop_assert!((0.0..=100.0).contains(&v), "rsi {}", v);
        }
    }
}

// ── 2. Vortex finiteness ─────────────────────────────────────────────

proptest! {
    #[test]
    fn vortex_finite_after_warmup(candles in arb_candles(), period in 2usize..20) {
        let plus = Vortex::plus(period).compute(&candles);
        let minus = Vortex::minus(period).compute(&candles);
        for i in period..candles.len() {
            prop_assert!(plus[i].is_finite() && plus[i] >= 0.0);
            prop_assert!(minus[i].is_finite() && minus[i] >= 0.0);
        }
    }
}

// ── 3–4. Scoring ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn strength_and_direction_follow_signed_score(
        candles in arb_candles(),
        kind in arb_strategy(),
    ) {
        let frame = compute(&candles, &IndicatorParams::default()).unwrap();
        let (p, c) = frame.last_two_valid().unwrap();
        let signed = score_rows(kind, &p, &c).signed;

        let signal = SignalScorer::new(kind)
            .score(&frame, &instrument(), Interval::OneMinute)
            .unwrap();
        prop_assert!(signal.strength >= 0.0);
        prop_assert_eq!(signal.strength, signed.abs());
        prop_assert_eq!(signal.direction == Direction::Call, signed > 0.0);
    }

    #[test]
    fn scoring_is_deterministic(candles in arb_candles(), kind in arb_strategy()) {
        let frame = compute(&candles, &IndicatorParams::default()).unwrap();
        let scorer = SignalScorer::new(kind);
        let a = scorer.score(&frame, &instrument(), Interval::OneMinute);
        let b = scorer.score(&frame, &instrument(), Interval::OneMinute);
        prop_assert_eq!(a, b);
    }
}
