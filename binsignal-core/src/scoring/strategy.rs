//! Strategy enumeration — each variant maps to a pure event detector over the
//! previous and latest valid frame rows.
//!
//! Events are discrete: a crossover or a dominance state either fires or not.
//! Each bullish event adds one to `bull`, each bearish event one to `bear`.

use crate::domain::IndicatorFamily;
use crate::indicators::FrameRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// EMA cross + RSI midline cross + Vortex dominance.
    Confluence,
    /// MACD/signal cross + Vortex dominance.
    MacdCross,
    /// %K/%D cross + RSI midline cross.
    StochasticCross,
    /// Bollinger band re-entry + EMA cross.
    BollingerReversion,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Confluence,
        StrategyKind::MacdCross,
        StrategyKind::StochasticCross,
        StrategyKind::BollingerReversion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Confluence => "confluence",
            StrategyKind::MacdCross => "macd_cross",
            StrategyKind::StochasticCross => "stochastic_cross",
            StrategyKind::BollingerReversion => "bollinger_reversion",
        }
    }

    /// Families credited when no event fires.
    pub fn default_families(&self) -> BTreeSet<IndicatorFamily> {
        use IndicatorFamily::*;
        match self {
            StrategyKind::Confluence => BTreeSet::from([Ema, Rsi, Vortex]),
            StrategyKind::MacdCross => BTreeSet::from([Macd, Vortex]),
            StrategyKind::StochasticCross => BTreeSet::from([Rsi, Stochastic]),
            StrategyKind::BollingerReversion => BTreeSet::from([Ema, Bollinger]),
        }
    }

    /// Detect this strategy's events between `p` (previous) and `c` (latest).
    pub fn detect(&self, p: &FrameRow, c: &FrameRow) -> Events {
        let mut events = Events::default();
        match self {
            StrategyKind::Confluence => {
                ema_cross(&mut events, p, c);
                rsi_midline(&mut events, p, c);
                vortex_dominance(&mut events, c);
            }
            StrategyKind::MacdCross => {
                let bull = c.macd > c.macd_signal && p.macd <= p.macd_signal;
                let bear = c.macd < c.macd_signal && p.macd >= p.macd_signal;
                events.record(IndicatorFamily::Macd, bull, bear);
                vortex_dominance(&mut events, c);
            }
            StrategyKind::StochasticCross => {
                let bull = c.stoch_k > c.stoch_d && p.stoch_k <= p.stoch_d;
                let bear = c.stoch_k < c.stoch_d && p.stoch_k >= p.stoch_d;
                events.record(IndicatorFamily::Stochastic, bull, bear);
                rsi_midline(&mut events, p, c);
            }
            StrategyKind::BollingerReversion => {
                let bull = p.close < p.bb_lower && c.close >= c.bb_lower;
                let bear = p.close > p.bb_upper && c.close <= c.bb_upper;
                events.record(IndicatorFamily::Bollinger, bull, bear);
                ema_cross(&mut events, p, c);
            }
        }
        events
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.name() == s.trim())
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Tally of fired events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    pub bull: u32,
    pub bear: u32,
    pub fired: BTreeSet<IndicatorFamily>,
}

impl Events {
    fn record(&mut self, family: IndicatorFamily, bull: bool, bear: bool) {
        if bull {
            self.bull += 1;
        }
        if bear {
            self.bear += 1;
        }
        if bull || bear {
            self.fired.insert(family);
        }
    }

    /// `bull - bear` as a signed float.
    pub fn net(&self) -> f64 {
        self.bull as f64 - self.bear as f64
    }
}

fn ema_cross(events: &mut Events, p: &FrameRow, c: &FrameRow) {
    let bull = c.ema_fast > c.ema_slow && p.ema_fast <= p.ema_slow;
    let bear = c.ema_fast < c.ema_slow && p.ema_fast >= p.ema_slow;
    events.record(IndicatorFamily::Ema, bull, bear);
}

fn rsi_midline(events: &mut Events, p: &FrameRow, c: &FrameRow) {
    let bull = c.rsi > 50.0 && p.rsi <= 50.0;
    let bear = c.rsi < 50.0 && p.rsi >= 50.0;
    events.record(IndicatorFamily::Rsi, bull, bear);
}

// Dominance of the latest row, not a flip between rows.
fn vortex_dominance(events: &mut Events, c: &FrameRow) {
    events.record(
        IndicatorFamily::Vortex,
        c.vi_plus > c.vi_minus,
        c.vi_plus < c.vi_minus,
    );
}

/// Which strategy scores which instrument within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPlan {
    Fixed(StrategyKind),
    /// Cycle through the list by the instrument's position in the session.
    Rotate(Vec<StrategyKind>),
}

impl Default for StrategyPlan {
    fn default() -> Self {
        StrategyPlan::Fixed(StrategyKind::Confluence)
    }
}

impl StrategyPlan {
    /// Strategy for the `index`-th instrument of the session.
    pub fn for_index(&self, index: usize) -> StrategyKind {
        match self {
            StrategyPlan::Fixed(kind) => *kind,
            StrategyPlan::Rotate(list) if list.is_empty() => StrategyKind::Confluence,
            StrategyPlan::Rotate(list) => list[index % list.len()],
        }
    }
}
