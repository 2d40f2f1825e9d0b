//! Indicator implementations and the frame that bundles them.
//!
//! Every indicator is a pure function from a candle series to a numeric series
//! of the same length. Leading warm-up entries are `f64::NAN`.
//!
//! Multi-series indicators (Vortex, MACD, Stochastic, Bollinger) expose one
//! instance per line so `Indicator` stays single-series.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod vortex;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::Ema;
pub use frame::{compute, FrameRow, IndicatorError, IndicatorFrame, IndicatorParams};
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use stochastic::{Stochastic, StochasticLine};
pub use vortex::{Vortex, VortexLine};

use crate::domain::Candle;

/// Trait for indicators.
///
/// No value at row t may depend on candles after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_9", "vortex_plus_14").
    fn name(&self) -> &str;

    /// Index of the first defined output value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series.
    ///
    /// Returns a `Vec<f64>` of the same length as `candles`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// Extract the close column.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Create synthetic minute candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::TimeZone;
    let base = chrono::Utc
        .with_ymd_and_hms(2024, 1, 2, 9, 0, 0)
        .single()
        .expect("valid base timestamp");
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::minutes(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
