//! Outcome resolution modes.
//!
//! `Measured` compares sampled entry and exit prices. `Simulated` is an
//! opt-in demo mode that draws WIN/LOSE from a seeded RNG; every outcome it
//! produces is flagged `simulated` and the message says so.

use binsignal_core::domain::{Outcome, Signal, TradeResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutcomeMode {
    #[default]
    Measured,
    Simulated { win_probability: f64, seed: u64 },
}

impl OutcomeMode {
    pub fn is_simulated(&self) -> bool {
        matches!(self, OutcomeMode::Simulated { .. })
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            OutcomeMode::Simulated {
                win_probability, ..
            } if !(0.0..=1.0).contains(win_probability) => Err(format!(
                "win_probability must be within [0, 1], got {win_probability}"
            )),
            _ => Ok(()),
        }
    }
}

/// Turns (signal, entry, exit) into an `Outcome` under one mode.
#[derive(Debug)]
pub struct OutcomeResolver {
    mode: OutcomeMode,
    rng: Option<StdRng>,
}

impl OutcomeResolver {
    pub fn new(mode: OutcomeMode) -> Self {
        let rng = match mode {
            OutcomeMode::Measured => None,
            OutcomeMode::Simulated { seed, .. } => Some(StdRng::seed_from_u64(seed)),
        };
        Self { mode, rng }
    }

    pub fn mode(&self) -> OutcomeMode {
        self.mode
    }

    /// A missing or non-finite price is NO_PRICE in every mode; the simulated
    /// mode only replaces the price comparison.
    pub fn resolve(&mut self, signal: Signal, entry: Option<f64>, exit: Option<f64>) -> Outcome {
        let priced = entry.is_some_and(f64::is_finite) && exit.is_some_and(f64::is_finite);
        match (self.mode, self.rng.as_mut()) {
            (OutcomeMode::Simulated { win_probability, .. }, Some(rng)) if priced => {
                let result = if rng.gen_bool(win_probability.clamp(0.0, 1.0)) {
                    TradeResult::Win
                } else {
                    TradeResult::Lose
                };
                Outcome {
                    signal,
                    entry_price: entry,
                    exit_price: exit,
                    result,
                    simulated: true,
                }
            }
            _ => Outcome::measured(signal, entry, exit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsignal_core::domain::{Direction, Instrument, Interval, SignalOrigin};
    use std::collections::BTreeSet;

    fn call_signal() -> Signal {
        Signal::from_score(
            &Instrument::new("EURUSD=X", "EUR/USD").unwrap(),
            1.0,
            BTreeSet::new(),
            Interval::OneMinute,
            1.1,
            SignalOrigin::Momentum,
        )
    }

    #[test]
    fn measured_mode_uses_price_movement() {
        let mut resolver = OutcomeResolver::new(OutcomeMode::Measured);
        let outcome = resolver.resolve(call_signal(), Some(1.1000), Some(1.1010));
        assert_eq!(outcome.signal.direction, Direction::Call);
        assert_eq!(outcome.result, TradeResult::Win);
        assert!(!outcome.simulated);

        let outcome = resolver.resolve(call_signal(), Some(1.1000), None);
        assert_eq!(outcome.result, TradeResult::NoPrice);
    }

    #[test]
    fn simulated_mode_is_flagged_and_seeded() {
        let mode = OutcomeMode::Simulated {
            win_probability: 0.5,
            seed: 9,
        };
        let draw = |mode| {
            let mut resolver = OutcomeResolver::new(mode);
            (0..20)
                .map(|_| resolver.resolve(call_signal(), Some(1.1), Some(1.1)))
                .collect::<Vec<_>>()
        };
        let a = draw(mode);
        let b = draw(mode);
        assert_eq!(a, b);
        assert!(a.iter().all(|o| o.simulated && o.result != TradeResult::NoPrice));
    }

    #[test]
    fn certain_probabilities() {
        let mut always = OutcomeResolver::new(OutcomeMode::Simulated {
            win_probability: 1.0,
            seed: 1,
        });
        assert_eq!(
            always.resolve(call_signal(), Some(1.1), Some(1.0)).result,
            TradeResult::Win
        );
        let mut never = OutcomeResolver::new(OutcomeMode::Simulated {
            win_probability: 0.0,
            seed: 1,
        });
        assert_eq!(
            never.resolve(call_signal(), Some(1.0), Some(1.1)).result,
            TradeResult::Lose
        );
    }

    #[test]
    fn simulated_mode_keeps_no_price_when_a_sample_is_missing() {
        let mut resolver = OutcomeResolver::new(OutcomeMode::Simulated {
            win_probability: 1.0,
            seed: 1,
        });
        for (entry, exit) in [
            (None, None),
            (Some(1.1), None),
            (None, Some(1.1)),
            (Some(f64::NAN), Some(1.1)),
        ] {
            let outcome = resolver.resolve(call_signal(), entry, exit);
            assert_eq!(outcome.result, TradeResult::NoPrice);
            assert!(!outcome.simulated);
        }
    }

    #[test]
    fn probability_outside_unit_interval_is_rejected() {
        let mode = OutcomeMode::Simulated {
            win_probability: 1.5,
            seed: 0,
        };
        assert!(mode.validate().is_err());
        assert!(OutcomeMode::Measured.validate().is_ok());
    }
}
