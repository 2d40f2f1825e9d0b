//! Signal scoring — fuses the latest indicator rows into one directional call.
//!
//! signed = (bull - bear)
//!        + VORTEX_WEIGHT * (vi_plus - vi_minus)
//!        + GAP_WEIGHT * (ema_fast - ema_slow) / max(|close|, CLOSE_EPSILON)
//!
//! Direction is CALL iff `signed > 0`; a signed score of exactly zero is PUT.
//! The reported strength is `|signed|`.

pub mod strategy;

pub use strategy::{Events, StrategyKind, StrategyPlan};

use crate::domain::{Instrument, Interval, Signal, SignalOrigin};
use crate::indicators::{FrameRow, IndicatorFrame};

/// Weight of the Vortex spread in the tie-break term.
pub const VORTEX_WEIGHT: f64 = 0.3;
/// Weight of the normalised EMA gap in the tie-break term.
pub const GAP_WEIGHT: f64 = 200.0;
/// Floor for `|close|` when normalising the EMA gap.
pub const CLOSE_EPSILON: f64 = 1e-9;

/// Signed score plus the events behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub signed: f64,
    pub events: Events,
}

/// Score a (previous, latest) row pair under a strategy.
pub fn score_rows(strategy: StrategyKind, p: &FrameRow, c: &FrameRow) -> Score {
    let events = strategy.detect(p, c);
    let vortex_spread = c.vi_plus - c.vi_minus;
    let gap = (c.ema_fast - c.ema_slow) / c.close.abs().max(CLOSE_EPSILON);
    let signed = events.net() + VORTEX_WEIGHT * vortex_spread + GAP_WEIGHT * gap;
    Score { signed, events }
}

/// Scores indicator frames with one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalScorer {
    strategy: StrategyKind,
}

impl Default for SignalScorer {
    fn default() -> Self {
        Self::new(StrategyKind::Confluence)
    }
}

impl SignalScorer {
    pub fn new(strategy: StrategyKind) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Score the last two valid rows of `frame`.
    ///
    /// Returns `None` when the frame has fewer than two valid rows or the
    /// score is not finite.
    pub fn score(
        &self,
        frame: &IndicatorFrame,
        instrument: &Instrument,
        timeframe: Interval,
    ) -> Option<Signal> {
        let (p, c) = frame.last_two_valid()?;
        let score = score_rows(self.strategy, &p, &c);
        if !score.signed.is_finite() {
            return None;
        }

        let contributing = if score.events.fired.is_empty() {
            self.strategy.default_families()
        } else {
            score.events.fired
        };

        Some(Signal::from_score(
            instrument,
            score.signed,
            contributing,
            timeframe,
            c.close,
            SignalOrigin::Scored(self.strategy),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, IndicatorFamily};
    use crate::indicators::{assert_approx, compute, make_candles, IndicatorParams};
    use std::collections::BTreeSet;

    fn flat_row() -> FrameRow {
        FrameRow {
            close: 2.0,
            ema_fast: 2.0,
            ema_slow: 2.0,
            rsi: 50.0,
            vi_plus: 1.0,
            vi_minus: 1.0,
            macd: 0.0,
            macd_signal: 0.0,
            stoch_k: 50.0,
            stoch_d: 50.0,
            bb_upper: 2.2,
            bb_middle: 2.0,
            bb_lower: 1.8,
        }
    }

    fn eurusd() -> Instrument {
        Instrument::new("EURUSD=X", "EUR/USD").unwrap()
    }

    #[test]
    fn tie_break_terms_use_fixed_weights() {
        // Fast EMA already above slow, so no cross; Vortex plus dominates (bull = 1).
        // signed = 1 + 0.3 * 0.2 + 200 * (0.001 / 2.0) = 1 + 0.06 + 0.1
        let p = FrameRow {
            ema_fast: 2.001,
            ..flat_row()
        };
        let c = FrameRow {
            ema_fast: 2.001,
            vi_plus: 1.1,
            vi_minus: 0.9,
            ..flat_row()
        };
        let score = score_rows(StrategyKind::Confluence, &p, &c);
        assert_approx(score.signed, 1.16, 1e-9);
        assert_eq!(score.events.bull, 1);
    }

    #[test]
    fn zero_close_uses_epsilon_floor() {
        let c = FrameRow {
            close: 0.0,
            ema_fast: 1e-12,
            ema_slow: 0.0,
            ..flat_row()
        };
        let p = FrameRow {
            ema_fast: 3.0,
            ..flat_row()
        };
        let score = score_rows(StrategyKind::Confluence, &p, &c);
        assert!(score.signed.is_finite());
        assert_eq!(score.events.bull, 0);
        assert_approx(score.signed, 0.2, 1e-9);
    }

    #[test]
    fn flat_score_is_put_with_default_attribution() {
        let score = score_rows(StrategyKind::Confluence, &flat_row(), &flat_row());
        assert_eq!(score.signed, 0.0);
        assert_eq!(Direction::from_signed(score.signed), Direction::Put);

        let candles = make_candles(&[5.0; 30]);
        let frame = compute(&candles, &IndicatorParams::default()).unwrap();
        let signal = SignalScorer::default()
            .score(&frame, &eurusd(), Interval::OneMinute)
            .unwrap();
        assert_eq!(signal.direction, Direction::Put);
        assert_eq!(signal.strength, 0.0);
        assert_eq!(
            signal.contributing_indicators,
            BTreeSet::from([IndicatorFamily::Ema, IndicatorFamily::Rsi, IndicatorFamily::Vortex])
        );
    }

    #[test]
    fn uptrend_scores_call() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 0.5).collect();
        let frame = compute(&make_candles(&closes), &IndicatorParams::default()).unwrap();
        let signal = SignalScorer::default()
            .score(&frame, &eurusd(), Interval::FiveMinutes)
            .unwrap();
        assert_eq!(signal.direction, Direction::Call);
        assert!(signal.strength > 0.0);
        assert_eq!(signal.reference_price, 119.5);
        assert_eq!(signal.timeframe_used, Interval::FiveMinutes);
        assert_eq!(signal.origin, SignalOrigin::Scored(StrategyKind::Confluence));
    }

    #[test]
    fn downtrend_scores_put() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 - i as f64 * 0.5).collect();
        let frame = compute(&make_candles(&closes), &IndicatorParams::default()).unwrap();
        let signal = SignalScorer::default()
            .score(&frame, &eurusd(), Interval::OneMinute)
            .unwrap();
        assert_eq!(signal.direction, Direction::Put);
        assert!(signal.strength > 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let closes: Vec<f64> = (0..50)
            .map(|i| 1.1 + 0.001 * ((i as f64) * 0.7).sin())
            .collect();
        let frame = compute(&make_candles(&closes), &IndicatorParams::default()).unwrap();
        for kind in StrategyKind::ALL {
            let scorer = SignalScorer::new(kind);
            let a = scorer.score(&frame, &eurusd(), Interval::OneMinute);
            let b = scorer.score(&frame, &eurusd(), Interval::OneMinute);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn needs_two_valid_rows() {
        let candles = make_candles(&[1.0; 20]);
        let mut frame = compute(&candles, &IndicatorParams::default()).unwrap();
        // Exactly one valid row (row 19).
        assert_eq!(frame.valid_rows().len(), 1);
        assert!(SignalScorer::default()
            .score(&frame, &eurusd(), Interval::OneMinute)
            .is_none());
        frame.rsi[19] = f64::NAN;
        assert!(frame.valid_rows().is_empty());
    }
}
