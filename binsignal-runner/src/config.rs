//! Session configuration: TOML file, environment overrides, credentials.
//!
//! Precedence: built-in defaults < `--config` TOML file < environment
//! variables (after `.env` has been loaded by the binary).

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use binsignal_core::domain::{Instrument, Interval, Lookback, SessionLabel};
use binsignal_core::indicators::IndicatorParams;
use binsignal_core::scoring::StrategyPlan;

use crate::outcome::OutcomeMode;
use crate::selector::{CascadeLevel, CascadePolicy};

/// Unique identifier for a session (BLAKE3 hex digest).
pub type SessionId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("{0} must be set for live runs")]
    MissingCredential(&'static str),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Everything a session needs besides its collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub session: SessionLabel,
    pub instruments: Vec<Instrument>,
    pub signals_per_session: usize,
    pub expiry_seconds: u64,
    pub start_delay_seconds: u64,
    pub after_result_delay_seconds: u64,
    /// Pause between the greeting and the session-start message.
    pub greeting_pause_seconds: u64,
    pub cascade: Vec<CascadeLevel>,
    pub cascade_policy: CascadePolicy,
    pub strategy: StrategyPlan,
    /// Minimum strength for a level to count as usable.
    pub acceptance_threshold: f64,
    /// Looser threshold for the second pass when the first finds nothing.
    pub degraded_threshold: f64,
    pub fallback_interval: Interval,
    pub fallback_lookback: Lookback,
    pub indicators: IndicatorParams,
    /// Statistics file. An empty string in the config file disables statistics.
    #[serde(deserialize_with = "empty_path_as_none")]
    pub stats_path: Option<PathBuf>,
    pub outcome: OutcomeMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session: SessionLabel::Morning,
            instruments: Instrument::major_fx_pairs(),
            signals_per_session: 5,
            expiry_seconds: 300,
            start_delay_seconds: 30,
            after_result_delay_seconds: 30,
            greeting_pause_seconds: 1,
            cascade: CascadeLevel::default_cascade(),
            cascade_policy: CascadePolicy::FirstSuccess,
            strategy: StrategyPlan::default(),
            acceptance_threshold: 0.0,
            degraded_threshold: 0.0,
            fallback_interval: Interval::OneDay,
            fallback_lookback: Lookback::ThreeMonths,
            indicators: IndicatorParams::default(),
            stats_path: Some(PathBuf::from("binsignal-stats.json")),
            outcome: OutcomeMode::Measured,
        }
    }
}

impl SessionConfig {
    /// Defaults, then the optional TOML file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override fields from environment-style variables.
    ///
    /// `get` abstracts the lookup so tests need not touch the process environment.
    pub fn apply_env<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SESSION") {
            self.session = v.parse().map_err(|e: String| ConfigError::invalid("SESSION", e))?;
        }
        if let Some(v) = get("EXPIRY_SECONDS") {
            self.expiry_seconds = parse_number("EXPIRY_SECONDS", &v)?;
        }
        if let Some(v) = get("START_DELAY_SECONDS") {
            self.start_delay_seconds = parse_number("START_DELAY_SECONDS", &v)?;
        }
        if let Some(v) = get("AFTER_RESULT_DELAY") {
            self.after_result_delay_seconds = parse_number("AFTER_RESULT_DELAY", &v)?;
        }
        if let Some(v) = get("SIGNALS_PER_SESSION") {
            self.signals_per_session = parse_number("SIGNALS_PER_SESSION", &v)?;
        }
        if let Some(v) = get("PAIRS") {
            self.instruments = Instrument::parse_list(&v)
                .map_err(|e| ConfigError::invalid("PAIRS", e.to_string()))?;
        }
        if let Some(v) = get("STATS_PATH") {
            self.stats_path = Some(PathBuf::from(v.trim()));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::invalid("instruments", "at least one instrument is required"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.instruments.iter().find(|i| !seen.insert(&i.symbol)) {
            return Err(ConfigError::invalid(
                "instruments",
                format!("duplicate symbol {}", dup.symbol),
            ));
        }
        if self.signals_per_session == 0 {
            return Err(ConfigError::invalid("signals_per_session", "must be >= 1"));
        }
        if self.cascade.is_empty() {
            return Err(ConfigError::invalid("cascade", "at least one level is required"));
        }
        for (key, value) in [
            ("acceptance_threshold", self.acceptance_threshold),
            ("degraded_threshold", self.degraded_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(key, "must be a finite, non-negative number"));
            }
        }
        if self.degraded_threshold > self.acceptance_threshold {
            return Err(ConfigError::invalid(
                "degraded_threshold",
                "must not exceed acceptance_threshold",
            ));
        }
        self.indicators
            .validate()
            .map_err(|e| ConfigError::invalid("indicators", e.to_string()))?;
        self.outcome
            .validate()
            .map_err(|e| ConfigError::invalid("outcome", e))?;
        Ok(())
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_seconds)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_secs(self.start_delay_seconds)
    }

    pub fn after_result_delay(&self) -> Duration {
        Duration::from_secs(self.after_result_delay_seconds)
    }

    pub fn greeting_pause(&self) -> Duration {
        Duration::from_secs(self.greeting_pause_seconds)
    }

    /// Whole minutes shown on the signal card.
    pub fn expiry_minutes(&self) -> u64 {
        self.expiry_seconds / 60
    }

    /// Deterministic session id: BLAKE3 over the config JSON and the start time.
    pub fn session_id(&self, started_at: DateTime<Utc>) -> Result<SessionId, ConfigError> {
        let json = serde_json::to_vec(self)?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&json);
        hasher.update(started_at.to_rfc3339().as_bytes());
        Ok(hasher.finalize().to_hex().to_string())
    }
}

fn empty_path_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let path = Option::<PathBuf>::deserialize(deserializer)?;
    Ok(path.filter(|p| !p.as_os_str().is_empty()))
}

fn parse_number<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(key, format!("'{value}': {e}")))
}

/// Telegram bot credentials. Required unless the run is a dry run.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };
        Ok(Self {
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            chat_id: required("TELEGRAM_CHAT_ID")?,
        })
    }
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binsignal_core::scoring::StrategyKind;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_bot_behaviour() {
        let config = SessionConfig::default();
        assert_eq!(config.expiry_seconds, 300);
        assert_eq!(config.start_delay_seconds, 30);
        assert_eq!(config.after_result_delay_seconds, 30);
        assert_eq!(config.signals_per_session, 5);
        assert_eq!(config.instruments.len(), 7);
        assert_eq!(config.cascade_policy, CascadePolicy::FirstSuccess);
        assert_eq!(config.expiry_minutes(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = SessionConfig::default();
        config
            .apply_env(lookup(&[
                ("SESSION", "evening"),
                ("EXPIRY_SECONDS", "120"),
                ("SIGNALS_PER_SESSION", "2"),
                ("PAIRS", "EURUSD=X:EUR/USD, BTC-USD:Bitcoin"),
                ("START_DELAY_SECONDS", ""),
            ]))
            .unwrap();
        assert_eq!(config.session, SessionLabel::Evening);
        assert_eq!(config.expiry_seconds, 120);
        assert_eq!(config.signals_per_session, 2);
        assert_eq!(config.instruments.len(), 2);
        assert_eq!(config.instruments[1].display_name, "Bitcoin");
        // Blank values are ignored.
        assert_eq!(config.start_delay_seconds, 30);
    }

    #[test]
    fn empty_stats_path_disables_statistics() {
        let config = SessionConfig::from_toml(r#"stats_path = """#).unwrap();
        assert_eq!(config.stats_path, None);

        let config = SessionConfig::from_toml(r#"stats_path = "data/stats.json""#).unwrap();
        assert_eq!(config.stats_path, Some(PathBuf::from("data/stats.json")));

        let config = SessionConfig::from_toml("").unwrap();
        assert_eq!(config.stats_path, Some(PathBuf::from("binsignal-stats.json")));
    }

    #[test]
    fn empty_instrument_symbol_is_rejected() {
        let toml = r#"
            [[instruments]]
            symbol = ""
            display_name = "Nothing"
        "#;
        assert!(matches!(
            SessionConfig::from_toml(toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn bad_env_number_names_the_key() {
        let mut config = SessionConfig::default();
        let err = config
            .apply_env(lookup(&[("EXPIRY_SECONDS", "five")]))
            .unwrap_err();
        assert!(err.to_string().contains("EXPIRY_SECONDS"));
    }

    #[test]
    fn toml_file_sets_policy_strategy_and_outcome() {
        let config = SessionConfig::from_toml(
            r#"
            session = "evening"
            signals_per_session = 3
            cascade_policy = "best_of"
            strategy = { rotate = ["confluence", "macd_cross"] }
            acceptance_threshold = 0.5
            degraded_threshold = 0.1

            [outcome]
            mode = "simulated"
            win_probability = 0.6
            seed = 7

            [[instruments]]
            symbol = "EURUSD=X"
            display_name = "EUR/USD"
            "#,
        )
        .unwrap();
        assert_eq!(config.session, SessionLabel::Evening);
        assert_eq!(config.cascade_policy, CascadePolicy::BestOf);
        assert_eq!(
            config.strategy,
            StrategyPlan::Rotate(vec![StrategyKind::Confluence, StrategyKind::MacdCross])
        );
        assert!(config.outcome.is_simulated());
        assert_eq!(config.instruments.len(), 1);
        // Unspecified fields keep their defaults.
        assert_eq!(config.expiry_seconds, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_toml_keys_are_rejected() {
        assert!(matches!(
            SessionConfig::from_toml("expiry = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = SessionConfig::default();
        config.degraded_threshold = 1.0;
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.instruments.push(config.instruments[0].clone());
        assert!(config.validate().is_err());

        let mut config = SessionConfig::default();
        config.signals_per_session = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn session_id_is_deterministic_and_time_sensitive() {
        let config = SessionConfig::default();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap();
        let a = config.session_id(t0).unwrap();
        assert_eq!(a, config.session_id(t0).unwrap());
        assert_ne!(a, config.session_id(t1).unwrap());
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn credentials_required_and_redacted() {
        let err = TelegramCredentials::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential("TELEGRAM_CHAT_ID")));

        let creds = TelegramCredentials::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:secret"),
            ("TELEGRAM_CHAT_ID", "-100"),
        ]))
        .unwrap();
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
