//! Signal — an immutable directional call produced by scoring an indicator frame.

use crate::domain::{Instrument, Interval};
use crate::scoring::StrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Directional intent of a binary-option signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Call,
    Put,
}

impl Direction {
    /// CALL iff the signed score is strictly positive. Zero resolves to PUT.
    pub fn from_signed(score: f64) -> Self {
        if score > 0.0 {
            Direction::Call
        } else {
            Direction::Put
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Call => "CALL",
            Direction::Put => "PUT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator families that can be credited with a signal.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndicatorFamily {
    Ema,
    Rsi,
    Vortex,
    Macd,
    Stochastic,
    Bollinger,
    Momentum,
}

impl IndicatorFamily {
    pub fn label(&self) -> &'static str {
        match self {
            IndicatorFamily::Ema => "EMA",
            IndicatorFamily::Rsi => "RSI",
            IndicatorFamily::Vortex => "Vortex",
            IndicatorFamily::Macd => "MACD",
            IndicatorFamily::Stochastic => "Stoch",
            IndicatorFamily::Bollinger => "BB",
            IndicatorFamily::Momentum => "Momentum",
        }
    }
}

/// Joins family labels with `+`, e.g. `EMA+RSI+Vortex`.
pub fn join_labels(families: &BTreeSet<IndicatorFamily>) -> String {
    families
        .iter()
        .map(IndicatorFamily::label)
        .collect::<Vec<_>>()
        .join("+")
}

/// How a signal was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalOrigin {
    /// Scored from an indicator frame by the given strategy.
    Scored(StrategyKind),
    /// Manufactured from raw price momentum by the last-resort fallback.
    Momentum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub instrument_id: String,
    pub display_name: String,
    pub direction: Direction,
    /// Unsigned magnitude of the fused score. Used only for ranking.
    pub strength: f64,
    pub contributing_indicators: BTreeSet<IndicatorFamily>,
    pub timeframe_used: Interval,
    /// Close of the last scored candle.
    pub reference_price: f64,
    pub origin: SignalOrigin,
}

impl Signal {
    /// Build a signal from a signed score; direction and strength both derive from it.
    pub fn from_score(
        instrument: &Instrument,
        signed_score: f64,
        contributing_indicators: BTreeSet<IndicatorFamily>,
        timeframe_used: Interval,
        reference_price: f64,
        origin: SignalOrigin,
    ) -> Self {
        Self {
            instrument_id: instrument.symbol.clone(),
            display_name: instrument.display_name.clone(),
            direction: Direction::from_signed(signed_score),
            strength: signed_score.abs(),
            contributing_indicators,
            timeframe_used,
            reference_price,
            origin,
        }
    }

    /// `EMA+RSI+Vortex`-style attribution label.
    pub fn strategy_label(&self) -> String {
        join_labels(&self.contributing_indicators)
    }
}
