//! Data source trait and structured error types.
//!
//! The `DataSource` trait abstracts over candle providers (Yahoo Finance,
//! synthetic walk) so sessions can swap implementations and tests can mock.

use crate::domain::{Candle, Interval, Lookback};
use thiserror::Error;
use tracing::{debug, warn};

/// Intervals tried, in order, when sampling the latest price.
pub const PRICE_CASCADE: [(Interval, Lookback); 2] = [
    (Interval::OneMinute, Lookback::OneDay),
    (Interval::FiveMinutes, Lookback::FiveDays),
];

/// Structured error types for data operations.
///
/// An empty result is not an error: `fetch` returns `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for candle providers.
pub trait DataSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch candles for `symbol` at `interval` covering `lookback`, ascending.
    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        lookback: Lookback,
    ) -> Result<Vec<Candle>, DataError>;

    /// Most recent close, trying each level of `PRICE_CASCADE` before giving up.
    fn latest_price(&self, symbol: &str) -> Option<f64> {
        for (interval, lookback) in PRICE_CASCADE {
            match self.fetch(symbol, interval, lookback) {
                Ok(candles) => {
                    if let Some(last) = candles.iter().rev().find(|c| c.close.is_finite()) {
                        return Some(last.close);
                    }
                    debug!(symbol, %interval, "no candles for latest price");
                }
                Err(e) => warn!(symbol, %interval, error = %e, "latest price fetch failed"),
            }
        }
        None
    }
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        lookback: Lookback,
    ) -> Result<Vec<Candle>, DataError> {
        (**self).fetch(symbol, interval, lookback)
    }

    fn latest_price(&self, symbol: &str) -> Option<f64> {
        (**self).latest_price(symbol)
    }
}
