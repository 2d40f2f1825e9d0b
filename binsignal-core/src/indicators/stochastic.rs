//! Stochastic oscillator.
//!
//! %K = 100 * (close - lowest_low(K)) / (highest_high(K) - lowest_low(K))
//! %D = SMA(%K, D)
//!
//! A flat window (zero range) reports 50.
//! Lookback: K - 1 for %K, K + D - 2 for %D.

use super::sma::sma_of_series;
use super::Indicator;
use crate::domain::Candle;

/// Which Stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn k(k_period: usize, d_period: usize) -> Self {
        Self::new(k_period, d_period, StochasticLine::K)
    }

    pub fn d(k_period: usize, d_period: usize) -> Self {
        Self::new(k_period, d_period, StochasticLine::D)
    }

    fn new(k_period: usize, d_period: usize, line: StochasticLine) -> Self {
        assert!(k_period >= 1 && d_period >= 1, "Stochastic periods must be >= 1");
        let prefix = match line {
            StochasticLine::K => "stoch_k",
            StochasticLine::D => "stoch_d",
        };
        Self {
            k_period,
            d_period,
            line,
            name: format!("{prefix}_{k_period}_{d_period}"),
        }
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            StochasticLine::K => self.k_period - 1,
            StochasticLine::D => self.k_period + self.d_period - 2,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let (k, d) = stochastic_pair(candles, self.k_period, self.d_period);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D => d,
        }
    }
}

/// Compute %K and %D together.
pub fn stochastic_pair(
    candles: &[Candle],
    k_period: usize,
    d_period: usize,
) -> (Vec<f64>, Vec<f64>) {
    let n = candles.len();
    let mut k = vec![f64::NAN; n];

    if k_period == 0 || n < k_period {
        return (k, vec![f64::NAN; n]);
    }

    for i in (k_period - 1)..n {
        let window = &candles[(i + 1 - k_period)..=i];
        let lowest = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let highest = window
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let close = candles[i].close;
        if close.is_nan() || !lowest.is_finite() || !highest.is_finite() {
            continue;
        }
        let range = highest - lowest;
        k[i] = if range == 0.0 {
            50.0
        } else {
            100.0 * (close - lowest) / range
        };
    }

    let d = sma_of_series(&k, d_period);
    (k, d)
}
