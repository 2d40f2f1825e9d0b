//! Relative Strength Index (RSI).
//!
//! Positive and negative close-to-close deltas are smoothed with the EMA
//! recursion at alpha = 1 / period, seeded with the first delta.
//! RSI = 100 - 100 / (1 + avg_up / avg_down)
//! Lookback: 0. Row 0 has no delta and a zero `avg_down` leaves the ratio
//! undefined; both report the neutral value 50.

use super::Indicator;
use crate::domain::Candle;

const NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];
        if n == 0 {
            return result;
        }
        if candles[0].close.is_nan() {
            return result;
        }
        result[0] = NEUTRAL;

        let alpha = 1.0 / self.period as f64;
        let mut averages: Option<(f64, f64)> = None;

        for i in 1..n {
            let delta = candles[i].close - candles[i - 1].close;
            if delta.is_nan() {
                return result;
            }
            let up = delta.max(0.0);
            let down = (-delta).max(0.0);

            let (avg_up, avg_down) = match averages {
                None => (up, down),
                Some((u, d)) => (alpha * up + (1.0 - alpha) * u, alpha * down + (1.0 - alpha) * d),
            };
            averages = Some((avg_up, avg_down));
            result[i] = rsi_value(avg_up, avg_down);
        }

        result
    }
}

fn rsi_value(avg_up: f64, avg_down: f64) -> f64 {
    if avg_down == 0.0 {
        NEUTRAL
    } else {
        100.0 - 100.0 / (1.0 + avg_up / avg_down)
    }
}
