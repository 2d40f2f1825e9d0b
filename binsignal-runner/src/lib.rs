//! binsignal runner — session orchestration on top of `binsignal-core`.
//!
//! This crate provides:
//! - Session configuration (TOML file + environment) and credentials
//! - Per-instrument timeframe selection over a fallback cascade
//! - Queue ranking, degraded pass and momentum fallback
//! - The session state machine and its report
//! - Measured and simulated outcome resolution
//! - The JSON statistics store behind recaps

pub mod config;
pub mod fallback;
pub mod outcome;
pub mod queue;
pub mod selector;
pub mod session;
pub mod stats;

pub use config::{ConfigError, SessionConfig, SessionId, TelegramCredentials};
pub use fallback::{momentum_candidates, momentum_signal, percent_change};
pub use outcome::{OutcomeMode, OutcomeResolver};
pub use queue::build_queue;
pub use selector::{CascadeLevel, CascadePolicy, LevelError, TimeframeSelector};
pub use session::{
    assemble_queue, QueueOrigin, SessionError, SessionOrchestrator, SessionReport, SessionState,
    Sleeper, ThreadSleeper,
};
pub use stats::{DailyStats, StatsError, StatsStore};
