//! binsignal core — candles, indicators, signal scoring, data sources, notification sinks.
//!
//! This crate holds everything below the session loop:
//! - Domain types (candles, instruments, signals, outcomes, tallies)
//! - Indicator math and the `IndicatorFrame` that bundles it
//! - Strategy event detection and the fused signal score
//! - The `DataSource` trait with Yahoo Finance and synthetic adapters
//! - The `NotificationSink` trait with Telegram and stdout adapters, plus message texts

pub mod data;
pub mod domain;
pub mod indicators;
pub mod notify;
pub mod scoring;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across the session loop are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::Instrument>();
        require_sync::<domain::Instrument>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Outcome>();
        require_sync::<domain::Outcome>();

        // Indicator and scoring types
        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();
        require_send::<scoring::SignalScorer>();
        require_sync::<scoring::SignalScorer>();
        require_send::<scoring::StrategyPlan>();
        require_sync::<scoring::StrategyPlan>();

        // Adapters
        require_send::<data::YahooSource>();
        require_sync::<data::YahooSource>();
        require_send::<data::SyntheticSource>();
        require_sync::<data::SyntheticSource>();
        require_send::<notify::TelegramSink>();
        require_sync::<notify::TelegramSink>();
        require_send::<notify::Message>();
        require_sync::<notify::Message>();
    }

    /// Architecture contract: the scorer sees only the frame, never a data source.
    #[test]
    fn scorer_takes_only_precomputed_frames() {
        fn _check(
            scorer: &scoring::SignalScorer,
            frame: &indicators::IndicatorFrame,
            instrument: &domain::Instrument,
        ) -> Option<domain::Signal> {
            scorer.score(frame, instrument, domain::Interval::OneMinute)
        }
    }
}
