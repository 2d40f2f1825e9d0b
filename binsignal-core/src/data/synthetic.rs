//! Synthetic data source — seeded random walks for offline runs and demos.
//!
//! Each symbol gets its own deterministic walk. Every `fetch` advances the
//! simulated clock by one bar so consecutive price samples differ.

use super::provider::{DataError, DataSource};
use crate::domain::{Candle, Interval, Lookback};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Upper bound on candles returned per fetch.
pub const MAX_BARS: usize = 500;

/// Relative per-bar volatility of the walk.
const STEP_VOLATILITY: f64 = 0.0005;

pub struct SyntheticSource {
    seed: u64,
    anchor: DateTime<Utc>,
    ticks: AtomicU64,
}

impl SyntheticSource {
    /// `anchor` is the timestamp of the latest bar before any fetch.
    pub fn new(seed: u64, anchor: DateTime<Utc>) -> Self {
        Self {
            seed,
            anchor,
            ticks: AtomicU64::new(0),
        }
    }

    /// FNV-1a over the symbol bytes, mixed with the source seed.
    fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in symbol.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash ^ self.seed
    }

    /// Close prices of the first `len` steps of the walk for `symbol`.
    fn walk(&self, symbol: &str, interval: Interval, len: usize) -> Vec<f64> {
        let seed = self.symbol_seed(symbol) ^ interval.seconds() as u64;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut price = 1.0 + (seed % 100) as f64 / 100.0;
        let mut closes = Vec::with_capacity(len);
        for _ in 0..len {
            price *= 1.0 + rng.gen_range(-1.0..1.0) * STEP_VOLATILITY;
            closes.push(price);
        }
        closes
    }
}

impl DataSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        lookback: Lookback,
    ) -> Result<Vec<Candle>, DataError> {
        if symbol.trim().is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) as usize;
        let bars = (lookback.seconds() / interval.seconds()).clamp(1, MAX_BARS as i64) as usize;
        let closes = self.walk(symbol, interval, MAX_BARS + tick);
        let window = &closes[closes.len() - bars..];

        let step = Duration::seconds(interval.seconds());
        let last_ts = self.anchor + Duration::minutes(tick as i64);
        let first_ts = last_ts - step * (bars as i32 - 1);

        let candles = window
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { window[i - 1] };
                let wick = close * STEP_VOLATILITY * 0.5;
                Candle {
                    timestamp: first_ts + step * i as i32,
                    open,
                    high: open.max(close) + wick,
                    low: open.min(close) - wick,
                    close,
                }
            })
            .collect();
        Ok(candles)
    }
}
