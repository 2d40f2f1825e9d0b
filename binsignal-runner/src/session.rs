//! SessionOrchestrator — the timed publish → wait → resolve loop.
//!
//! States run strictly in sequence:
//! `Starting → BuildingQueue → Publishing(i) → WaitingExpiry(i) → Resolving(i) → … → Ended`.
//! Every transition is recorded in the report's trace. Waits go through a
//! `Sleeper` so tests run instantly.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use binsignal_core::data::DataSource;
use binsignal_core::domain::{Outcome, SessionLabel, Signal, Tally};
use binsignal_core::notify::{format, Message, NotificationSink};
use binsignal_core::scoring::SignalScorer;

use crate::config::{ConfigError, SessionConfig, SessionId};
use crate::fallback::momentum_candidates;
use crate::outcome::OutcomeResolver;
use crate::queue::build_queue;
use crate::selector::TimeframeSelector;
use crate::stats::StatsStore;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Blocking wait between session steps.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Production sleeper: blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SessionState {
    Starting,
    BuildingQueue,
    Publishing(usize),
    WaitingExpiry(usize),
    Resolving(usize),
    Ended,
}

/// Which pass produced the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOrigin {
    /// Scored signals at the acceptance threshold.
    Primary,
    /// Scored signals at the looser degraded threshold.
    Degraded,
    /// Raw price momentum.
    Momentum,
    /// Nothing usable.
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub label: SessionLabel,
    pub started_at: DateTime<Utc>,
    pub queue_origin: QueueOrigin,
    pub queue: Vec<Signal>,
    pub outcomes: Vec<Outcome>,
    pub tally: Tally,
    pub trace: Vec<SessionState>,
    /// Messages the sink failed to deliver.
    pub failed_sends: usize,
}

/// Run the selector over every instrument, then the degraded pass and the
/// momentum fallback if needed, and rank the result into a queue.
pub fn assemble_queue(config: &SessionConfig, source: &dyn DataSource) -> (Vec<Signal>, QueueOrigin) {
    let selector = TimeframeSelector::new(
        config.cascade.clone(),
        config.cascade_policy,
        config.indicators.clone(),
    );
    let candidates_at = |threshold: f64| -> Vec<Signal> {
        config
            .instruments
            .iter()
            .enumerate()
            .filter_map(|(i, instrument)| {
                let scorer = SignalScorer::new(config.strategy.for_index(i));
                let found = selector.select(source, instrument, &scorer, threshold);
                if found.is_none() {
                    info!(symbol = %instrument.symbol, "no signal for instrument");
                }
                found
            })
            .collect()
    };

    let mut candidates = candidates_at(config.acceptance_threshold);
    let mut origin = QueueOrigin::Primary;

    if candidates.is_empty() && config.degraded_threshold < config.acceptance_threshold {
        warn!(
            threshold = config.degraded_threshold,
            "no candidates at acceptance threshold, running degraded pass"
        );
        candidates = candidates_at(config.degraded_threshold);
        origin = QueueOrigin::Degraded;
    }

    if candidates.is_empty() {
        warn!("no scored candidates, falling back to momentum");
        candidates = momentum_candidates(
            source,
            &config.instruments,
            config.fallback_interval,
            config.fallback_lookback,
        );
        origin = QueueOrigin::Momentum;
    }

    let queue = build_queue(candidates, config.signals_per_session);
    if queue.is_empty() {
        origin = QueueOrigin::Empty;
    }
    (queue, origin)
}

pub struct SessionOrchestrator<'a> {
    config: &'a SessionConfig,
    source: &'a dyn DataSource,
    sink: &'a dyn NotificationSink,
    sleeper: &'a dyn Sleeper,
    stats: Option<StatsStore>,
    resolver: OutcomeResolver,
    trace: Vec<SessionState>,
    failed_sends: usize,
}

impl<'a> SessionOrchestrator<'a> {
    pub fn new(
        config: &'a SessionConfig,
        source: &'a dyn DataSource,
        sink: &'a dyn NotificationSink,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            config,
            source,
            sink,
            sleeper,
            stats: None,
            resolver: OutcomeResolver::new(config.outcome),
            trace: Vec::new(),
            failed_sends: 0,
        }
    }

    /// Write the session tally to `store` after the session ends.
    pub fn with_stats(mut self, store: StatsStore) -> Self {
        self.stats = Some(store);
        self
    }

    pub fn run(self) -> Result<SessionReport, SessionError> {
        self.run_at(Utc::now())
    }

    /// Run a full session stamped with `started_at`.
    pub fn run_at(mut self, started_at: DateTime<Utc>) -> Result<SessionReport, SessionError> {
        self.config.validate()?;
        let session_id = self.config.session_id(started_at)?;
        let label = self.config.session;
        info!(
            %session_id,
            session = %label,
            source = self.source.name(),
            sink = self.sink.name(),
            "session starting"
        );

        self.enter(SessionState::Starting);
        self.notify(format::greeting(label));
        self.sleeper.sleep(self.config.greeting_pause());
        self.notify(format::session_start(label));
        self.sleeper.sleep(self.config.start_delay());

        self.enter(SessionState::BuildingQueue);
        let (queue, queue_origin) = assemble_queue(self.config, self.source);
        info!(size = queue.len(), origin = ?queue_origin, "queue built");

        let mut outcomes = Vec::with_capacity(queue.len());
        if queue.is_empty() {
            self.notify(format::no_signals());
        }
        for (i, signal) in queue.iter().enumerate() {
            outcomes.push(self.trade(i, signal.clone()));
        }

        self.enter(SessionState::Ended);
        self.notify(format::session_end(label));

        let tally: Tally = outcomes.iter().collect();
        self.record_stats(started_at, &tally);

        Ok(SessionReport {
            session_id,
            label,
            started_at,
            queue_origin,
            queue,
            outcomes,
            tally,
            trace: self.trace,
            failed_sends: self.failed_sends,
        })
    }

    /// Publish one signal, wait out its expiry, and resolve it.
    fn trade(&mut self, i: usize, signal: Signal) -> Outcome {
        self.enter(SessionState::Publishing(i));
        self.notify(format::signal_card(&signal, self.config.expiry_minutes()));
        let entry = self.source.latest_price(&signal.instrument_id);

        self.enter(SessionState::WaitingExpiry(i));
        self.sleeper.sleep(self.config.expiry());

        self.enter(SessionState::Resolving(i));
        let exit = self.source.latest_price(&signal.instrument_id);
        let outcome = self.resolver.resolve(signal, entry, exit);
        info!(
            symbol = %outcome.signal.instrument_id,
            direction = %outcome.signal.direction,
            ?entry,
            ?exit,
            result = %outcome.result,
            "signal resolved"
        );
        self.notify(format::outcome(&outcome));
        self.sleeper.sleep(self.config.after_result_delay());
        outcome
    }

    fn enter(&mut self, state: SessionState) {
        info!(?state, "session state");
        self.trace.push(state);
    }

    /// Send a message; failures are logged and counted, never propagated.
    fn notify(&mut self, message: Message) {
        if let Err(e) = self.sink.send(&message) {
            self.failed_sends += 1;
            warn!(kind = ?message.kind, sink = self.sink.name(), error = %e, "notification failed");
        }
    }

    fn record_stats(&self, started_at: DateTime<Utc>, tally: &Tally) {
        let Some(store) = &self.stats else {
            return;
        };
        if let Err(e) = store.record_session(started_at.date_naive(), self.config.session, tally) {
            warn!(path = %store.path().display(), error = %e, "failed to record session stats");
        }
    }
}
