//! IndicatorFrame — a candle series augmented with every derived column the
//! scorer reads.
//!
//! Every column has the same length as the candle series. Warm-up entries are
//! NaN; rows with any NaN are not valid for scoring.

use super::bollinger::bollinger_bands;
use super::ema::ema_of_series;
use super::macd::macd_pair;
use super::stochastic::stochastic_pair;
use super::vortex::vortex_pair;
use super::{closes, Bollinger, Ema, Indicator, Macd, MacdLine, Rsi, Stochastic, Vortex};
use crate::domain::{is_ascending, Candle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("insufficient history: {rows} rows, need at least {required}")]
    InsufficientHistory { rows: usize, required: usize },

    #[error("invalid indicator parameters: {0}")]
    InvalidParams(String),

    #[error("candles are not strictly ascending by timestamp")]
    Unordered,
}

/// Periods and multipliers for every indicator in the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub vortex_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 9,
            ema_slow: 21,
            rsi_period: 14,
            vortex_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_k: 14,
            stoch_d: 3,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("rsi_period", self.rsi_period),
            ("vortex_period", self.vortex_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("stoch_k", self.stoch_k),
            ("stoch_d", self.stoch_d),
            ("bollinger_period", self.bollinger_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(IndicatorError::InvalidParams(format!("{name} must be >= 1")));
        }
        if self.ema_slow <= self.ema_fast {
            return Err(IndicatorError::InvalidParams(
                "ema_slow must be > ema_fast".into(),
            ));
        }
        if self.macd_slow <= self.macd_fast {
            return Err(IndicatorError::InvalidParams(
                "macd_slow must be > macd_fast".into(),
            ));
        }
        if !(self.bollinger_multiplier.is_finite() && self.bollinger_multiplier > 0.0) {
            return Err(IndicatorError::InvalidParams(
                "bollinger_multiplier must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Every indicator the frame carries, one instance per column.
    ///
    /// Callers must `validate()` first; the constructors assert on bad periods.
    pub fn indicators(&self) -> Vec<Box<dyn Indicator>> {
        vec![
            Box::new(Ema::new(self.ema_fast)),
            Box::new(Ema::new(self.ema_slow)),
            Box::new(Rsi::new(self.rsi_period)),
            Box::new(Vortex::plus(self.vortex_period)),
            Box::new(Vortex::minus(self.vortex_period)),
            Box::new(Macd::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
                MacdLine::Macd,
            )),
            Box::new(Macd::new(
                self.macd_fast,
                self.macd_slow,
                self.macd_signal,
                MacdLine::Signal,
            )),
            Box::new(Stochastic::k(self.stoch_k, self.stoch_d)),
            Box::new(Stochastic::d(self.stoch_k, self.stoch_d)),
            Box::new(Bollinger::upper(self.bollinger_period, self.bollinger_multiplier)),
            Box::new(Bollinger::middle(self.bollinger_period, self.bollinger_multiplier)),
            Box::new(Bollinger::lower(self.bollinger_period, self.bollinger_multiplier)),
        ]
    }

    /// Minimum candle count: one past the longest warm-up of any indicator.
    pub fn required_rows(&self) -> usize {
        self.indicators()
            .iter()
            .map(|ind| ind.lookback())
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// One row of the frame, copied out for scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRow {
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub rsi: f64,
    pub vi_plus: f64,
    pub vi_minus: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
}

impl FrameRow {
    /// True when every derived value is defined.
    pub fn is_valid(&self) -> bool {
        [
            self.close,
            self.ema_fast,
            self.ema_slow,
            self.rsi,
            self.vi_plus,
            self.vi_minus,
            self.macd,
            self.macd_signal,
            self.stoch_k,
            self.stoch_d,
            self.bb_upper,
            self.bb_middle,
            self.bb_lower,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub candles: Vec<Candle>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub vi_plus: Vec<f64>,
    pub vi_minus: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub stoch_k: Vec<f64>,
    pub stoch_d: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_middle: Vec<f64>,
    pub bb_lower: Vec<f64>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<FrameRow> {
        let candle = self.candles.get(i)?;
        Some(FrameRow {
            close: candle.close,
            ema_fast: self.ema_fast[i],
            ema_slow: self.ema_slow[i],
            rsi: self.rsi[i],
            vi_plus: self.vi_plus[i],
            vi_minus: self.vi_minus[i],
            macd: self.macd[i],
            macd_signal: self.macd_signal[i],
            stoch_k: self.stoch_k[i],
            stoch_d: self.stoch_d[i],
            bb_upper: self.bb_upper[i],
            bb_middle: self.bb_middle[i],
            bb_lower: self.bb_lower[i],
        })
    }

    /// Rows with every derived value defined, in ascending order.
    pub fn valid_rows(&self) -> Vec<FrameRow> {
        (0..self.len())
            .filter_map(|i| self.row(i))
            .filter(FrameRow::is_valid)
            .collect()
    }

    /// The previous and latest valid rows, if there are at least two.
    pub fn last_two_valid(&self) -> Option<(FrameRow, FrameRow)> {
        let mut iter = (0..self.len())
            .rev()
            .filter_map(|i| self.row(i))
            .filter(FrameRow::is_valid);
        let latest = iter.next()?;
        let previous = iter.next()?;
        Some((previous, latest))
    }
}

/// Compute every indicator column for a candle series.
pub fn compute(candles: &[Candle], params: &IndicatorParams) -> Result<IndicatorFrame, IndicatorError> {
    params.validate()?;

    let required = params.required_rows();
    if candles.len() < required {
        return Err(IndicatorError::InsufficientHistory {
            rows: candles.len(),
            required,
        });
    }

    if !is_ascending(candles) {
        return Err(IndicatorError::Unordered);
    }

    let close = closes(candles);
    let (vi_plus, vi_minus) = vortex_pair(candles, params.vortex_period);
    let (macd, macd_signal) =
        macd_pair(candles, params.macd_fast, params.macd_slow, params.macd_signal);
    let (stoch_k, stoch_d) = stochastic_pair(candles, params.stoch_k, params.stoch_d);
    let bands = bollinger_bands(candles, params.bollinger_period, params.bollinger_multiplier);

    Ok(IndicatorFrame {
        candles: candles.to_vec(),
        ema_fast: ema_of_series(&close, params.ema_fast),
        ema_slow: ema_of_series(&close, params.ema_slow),
        rsi: Rsi::new(params.rsi_period).compute(candles),
        vi_plus,
        vi_minus,
        macd,
        macd_signal,
        stoch_k,
        stoch_d,
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
    })
}
