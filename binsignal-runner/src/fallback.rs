//! Momentum fallback: the last resort when no instrument yields a scored
//! signal, even at the degraded threshold.
//!
//! Momentum is the percent change from the first to the last close over a
//! longer lookback. Its sign gives the direction and its magnitude the strength.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use binsignal_core::data::DataSource;
use binsignal_core::domain::{IndicatorFamily, Instrument, Interval, Lookback, Signal, SignalOrigin};

use crate::selector::LevelError;

/// Percent change from the first to the last close, `None` when undefined.
pub fn percent_change(closes: &[f64]) -> Option<f64> {
    let (first, last) = (*closes.first()?, *closes.last()?);
    if closes.len() < 2 || first == 0.0 || !first.is_finite() || !last.is_finite() {
        return None;
    }
    Some((last - first) / first * 100.0)
}

pub fn momentum_signal(
    source: &dyn DataSource,
    instrument: &Instrument,
    interval: Interval,
    lookback: Lookback,
) -> Result<Signal, LevelError> {
    let candles = source.fetch(&instrument.symbol, interval, lookback)?;
    if candles.is_empty() {
        return Err(LevelError::Empty);
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let pct = percent_change(&closes).ok_or(LevelError::NoScore)?;
    let last = closes[closes.len() - 1];

    debug!(symbol = %instrument.symbol, pct, "momentum computed");
    Ok(Signal::from_score(
        instrument,
        pct,
        BTreeSet::from([IndicatorFamily::Momentum]),
        interval,
        last,
        SignalOrigin::Momentum,
    ))
}

/// One momentum signal per instrument that has usable history.
pub fn momentum_candidates(
    source: &dyn DataSource,
    instruments: &[Instrument],
    interval: Interval,
    lookback: Lookback,
) -> Vec<Signal> {
    instruments
        .iter()
        .filter_map(|instrument| {
            match momentum_signal(source, instrument, interval, lookback) {
                Ok(signal) => Some(signal),
                Err(e) => {
                    warn!(symbol = %instrument.symbol, error = %e, "momentum fallback failed");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsignal_core::data::DataError;
    use binsignal_core::domain::{Candle, Direction};
    use chrono::{TimeZone, Utc};

    struct DailyCloses(Vec<f64>);

    impl DataSource for DailyCloses {
        fn name(&self) -> &str {
            "daily"
        }

        fn fetch(&self, symbol: &str, _: Interval, _: Lookback) -> Result<Vec<Candle>, DataError> {
            if symbol == "DEAD" {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.into(),
                });
            }
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Ok(self
                .0
                .iter()
                .enumerate()
                .map(|(i, &c)| Candle {
                    timestamp: base + chrono::Duration::days(i as i64),
                    open: c,
                    high: c,
                    low: c,
                    close: c,
                })
                .collect())
        }
    }

    #[test]
    fn percent_change_edge_cases() {
        assert_eq!(percent_change(&[]), None);
        assert_eq!(percent_change(&[1.0]), None);
        assert_eq!(percent_change(&[0.0, 1.0]), None);
        let pct = percent_change(&[2.0, 1.0, 2.5]).unwrap();
        assert!((pct - 25.0).abs() < 1e-12);
    }

    #[test]
    fn falling_market_gives_put_with_momentum_attribution() {
        let source = DailyCloses(vec![1.25, 1.20, 1.00]);
        let inst = Instrument::new("GBPUSD=X", "GBP/USD").unwrap();
        let signal =
            momentum_signal(&source, &inst, Interval::OneDay, Lookback::ThreeMonths).unwrap();
        assert_eq!(signal.direction, Direction::Put);
        assert!((signal.strength - 20.0).abs() < 1e-9);
        assert_eq!(signal.origin, SignalOrigin::Momentum);
        assert_eq!(signal.strategy_label(), "Momentum");
        assert_eq!(signal.reference_price, 1.00);
    }

    #[test]
    fn failing_instruments_are_skipped() {
        let source = DailyCloses(vec![1.0, 1.1]);
        let instruments = vec![
            Instrument::new("DEAD", "").unwrap(),
            Instrument::new("EURUSD=X", "EUR/USD").unwrap(),
        ];
        let found =
            momentum_candidates(&source, &instruments, Interval::OneDay, Lookback::ThreeMonths);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instrument_id, "EURUSD=X");
    }
}
