//! TimeframeSelector — walks the (interval, lookback) cascade for one
//! instrument and picks a usable signal.
//!
//! A level is usable when its candles compute into a frame, the scorer returns
//! a signal, and the signal's strength meets the caller's threshold. Failures
//! at one level are logged and the next level is tried.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use binsignal_core::data::{DataError, DataSource};
use binsignal_core::domain::{Instrument, Interval, Lookback, Signal};
use binsignal_core::indicators::{compute, IndicatorError, IndicatorParams};
use binsignal_core::scoring::SignalScorer;

/// One (interval, lookback) pair of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeLevel {
    pub interval: Interval,
    pub lookback: Lookback,
}

impl CascadeLevel {
    pub const fn new(interval: Interval, lookback: Lookback) -> Self {
        Self { interval, lookback }
    }

    /// 1m over 1d, then 5m over 5d, then 15m over 1mo.
    pub fn default_cascade() -> Vec<CascadeLevel> {
        vec![
            CascadeLevel::new(Interval::OneMinute, Lookback::OneDay),
            CascadeLevel::new(Interval::FiveMinutes, Lookback::FiveDays),
            CascadeLevel::new(Interval::FifteenMinutes, Lookback::OneMonth),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Stop at the first usable level.
    #[default]
    FirstSuccess,
    /// Evaluate every level and keep the strongest; ties keep the earlier level.
    BestOf,
}

/// Why a cascade level produced no signal.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("data unavailable: {0}")]
    Data(#[from] DataError),

    #[error("data unavailable: empty result")]
    Empty,

    #[error(transparent)]
    Indicators(#[from] IndicatorError),

    #[error("fewer than two valid indicator rows")]
    NoScore,

    #[error("strength {strength:.4} below threshold {threshold:.4}")]
    BelowThreshold { strength: f64, threshold: f64 },
}

#[derive(Debug, Clone)]
pub struct TimeframeSelector {
    levels: Vec<CascadeLevel>,
    policy: CascadePolicy,
    params: IndicatorParams,
}

impl TimeframeSelector {
    pub fn new(levels: Vec<CascadeLevel>, policy: CascadePolicy, params: IndicatorParams) -> Self {
        Self {
            levels,
            policy,
            params,
        }
    }

    pub fn levels(&self) -> &[CascadeLevel] {
        &self.levels
    }

    /// Fetch, compute and score a single level.
    pub fn evaluate_level(
        &self,
        source: &dyn DataSource,
        instrument: &Instrument,
        scorer: &SignalScorer,
        level: CascadeLevel,
        threshold: f64,
    ) -> Result<Signal, LevelError> {
        let candles = source.fetch(&instrument.symbol, level.interval, level.lookback)?;
        debug!(
            symbol = %instrument.symbol,
            interval = %level.interval,
            rows = candles.len(),
            "fetched level"
        );
        if candles.is_empty() {
            return Err(LevelError::Empty);
        }

        let frame = compute(&candles, &self.params)?;
        let signal = scorer
            .score(&frame, instrument, level.interval)
            .ok_or(LevelError::NoScore)?;
        if signal.strength < threshold {
            return Err(LevelError::BelowThreshold {
                strength: signal.strength,
                threshold,
            });
        }
        Ok(signal)
    }

    /// Walk the cascade under the configured policy.
    ///
    /// Returns `None` when no level is usable.
    pub fn select(
        &self,
        source: &dyn DataSource,
        instrument: &Instrument,
        scorer: &SignalScorer,
        threshold: f64,
    ) -> Option<Signal> {
        let mut best: Option<Signal> = None;
        for &level in &self.levels {
            match self.evaluate_level(source, instrument, scorer, level, threshold) {
                Ok(signal) => match self.policy {
                    CascadePolicy::FirstSuccess => return Some(signal),
                    CascadePolicy::BestOf => {
                        if best.as_ref().map_or(true, |b| signal.strength > b.strength) {
                            best = Some(signal);
                        }
                    }
                },
                Err(LevelError::BelowThreshold { strength, threshold }) => {
                    debug!(
                        symbol = %instrument.symbol,
                        interval = %level.interval,
                        strength,
                        threshold,
                        "level below threshold"
                    );
                }
                Err(e) => {
                    warn!(
                        symbol = %instrument.symbol,
                        interval = %level.interval,
                        error = %e,
                        "cascade level failed"
                    );
                }
            }
        }
        best
    }
}
