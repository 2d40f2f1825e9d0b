//! Tradable instrument: provider symbol plus the name shown to subscribers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("instrument symbol must not be empty")]
    EmptySymbol,

    #[error("invalid instrument spec '{0}' (expected SYMBOL or SYMBOL:Display Name)")]
    InvalidSpec(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInstrument")]
pub struct Instrument {
    /// Provider symbol, e.g. `EURUSD=X`. Unique within a session.
    pub symbol: String,
    /// Display name, e.g. `EUR/USD`.
    pub display_name: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, InstrumentError> {
        let symbol = symbol.into().trim().to_string();
        if symbol.is_empty() {
            return Err(InstrumentError::EmptySymbol);
        }
        let display_name = display_name.into().trim().to_string();
        let display_name = if display_name.is_empty() {
            symbol.clone()
        } else {
            display_name
        };
        Ok(Self {
            symbol,
            display_name,
        })
    }

    /// The seven major FX pairs quoted on Yahoo Finance.
    pub fn major_fx_pairs() -> Vec<Instrument> {
        [
            ("EURUSD=X", "EUR/USD"),
            ("GBPUSD=X", "GBP/USD"),
            ("USDJPY=X", "USD/JPY"),
            ("AUDUSD=X", "AUD/USD"),
            ("USDCHF=X", "USD/CHF"),
            ("USDCAD=X", "USD/CAD"),
            ("NZDUSD=X", "NZD/USD"),
        ]
        .into_iter()
        .map(|(symbol, name)| Instrument {
            symbol: symbol.to_string(),
            display_name: name.to_string(),
        })
        .collect()
    }

    /// Parse a comma-separated list of `SYMBOL:Display` specs.
    pub fn parse_list(list: &str) -> Result<Vec<Instrument>, InstrumentError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Instrument {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((symbol, name)) => {
                if name.contains(':') {
                    return Err(InstrumentError::InvalidSpec(s.to_string()));
                }
                Instrument::new(symbol, name)
            }
            None => Instrument::new(s, ""),
        }
    }
}

/// Deserialized form; goes through `Instrument::new` for trimming and checks.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInstrument {
    symbol: String,
    #[serde(default)]
    display_name: String,
}

impl TryFrom<RawInstrument> for Instrument {
    type Error = InstrumentError;

    fn try_from(raw: RawInstrument) -> Result<Self, Self::Error> {
        Instrument::new(raw.symbol, raw.display_name)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbol_with_display_name() {
        let inst: Instrument = "EURUSD=X:EUR/USD".parse().unwrap();
        assert_eq!(inst.symbol, "EURUSD=X");
        assert_eq!(inst.display_name, "EUR/USD");
    }

    #[test]
    fn bare_symbol_uses_symbol_as_name() {
        let inst: Instrument = "BTC-USD".parse().unwrap();
        assert_eq!(inst.display_name, "BTC-USD");
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert_eq!(" :Foo".parse::<Instrument>(), Err(InstrumentError::EmptySymbol));
        assert!(matches!(
            "A:B:C".parse::<Instrument>(),
            Err(InstrumentError::InvalidSpec(_))
        ));
    }

    #[test]
    fn parse_list_skips_blank_entries() {
        let list = Instrument::parse_list("EURUSD=X:EUR/USD, ,GBPUSD=X:GBP/USD,").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].display_name, "GBP/USD");
    }

    #[test]
    fn deserialize_applies_constructor_checks() {
        let inst: Instrument =
            serde_json::from_str(r#"{"symbol":" EURUSD=X ","display_name":""}"#).unwrap();
        assert_eq!(inst.symbol, "EURUSD=X");
        assert_eq!(inst.display_name, "EURUSD=X");

        assert!(serde_json::from_str::<Instrument>(r#"{"symbol":"  "}"#).is_err());
    }

    #[test]
    fn default_pairs_are_unique() {
        let pairs = Instrument::major_fx_pairs();
        assert_eq!(pairs.len(), 7);
        let mut symbols: Vec<_> = pairs.iter().map(|p| p.symbol.as_str()).collect();
        symbols.sort();
        symbols.dedup();
        assert_eq!(symbols.len(), 7);
    }
}
