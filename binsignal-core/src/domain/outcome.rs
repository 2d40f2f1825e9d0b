//! Outcome — the resolution of a published signal after its expiry.

use super::{Direction, Signal};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeResult {
    Win,
    Lose,
    /// Entry or exit price could not be sampled.
    NoPrice,
}

impl TradeResult {
    /// Resolve by comparing the exit price against the entry price.
    ///
    /// Equal prices are a loss in both directions.
    pub fn resolve(direction: Direction, entry: Option<f64>, exit: Option<f64>) -> Self {
        match (entry, exit) {
            (Some(entry), Some(exit)) if entry.is_finite() && exit.is_finite() => {
                let won = match direction {
                    Direction::Call => exit > entry,
                    Direction::Put => exit < entry,
                };
                if won {
                    TradeResult::Win
                } else {
                    TradeResult::Lose
                }
            }
            _ => TradeResult::NoPrice,
        }
    }
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeResult::Win => "WIN",
            TradeResult::Lose => "LOSE",
            TradeResult::NoPrice => "NO_PRICE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub signal: Signal,
    pub entry_price: Option<f64>,
    pub exit_price: Option<f64>,
    pub result: TradeResult,
    /// True when the result was drawn by the demo simulator rather than measured.
    pub simulated: bool,
}

impl Outcome {
    pub fn measured(signal: Signal, entry_price: Option<f64>, exit_price: Option<f64>) -> Self {
        let result = TradeResult::resolve(signal.direction, entry_price, exit_price);
        Self {
            signal,
            entry_price,
            exit_price,
            result,
            simulated: false,
        }
    }
}

/// Win/loss counters. NO_PRICE results are counted separately and never
/// enter the win rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub no_price: u32,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Tally {
    pub fn record(&mut self, result: TradeResult) {
        match result {
            TradeResult::Win => self.wins += 1,
            TradeResult::Lose => self.losses += 1,
            TradeResult::NoPrice => self.no_price += 1,
        }
    }

    pub fn merge(&mut self, other: &Tally) {
        self.wins += other.wins;
        self.losses += other.losses;
        self.no_price += other.no_price;
    }

    /// Resolved trades (wins + losses).
    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }

    /// Win percentage over decided trades, `None` when nothing was decided.
    pub fn win_rate(&self) -> Option<f64> {
        match self.decided() {
            0 => None,
            n => Some(100.0 * self.wins as f64 / n as f64),
        }
    }
}

impl<'a> FromIterator<&'a Outcome> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a Outcome>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for outcome in iter {
            tally.record(outcome.result);
        }
        tally
    }
}
