//! Statistics store: daily win/loss counters per session, persisted as JSON.
//!
//! File shape: `{ "2024-03-01": { "morning": { "wins": 3, "losses": 1 } } }`.
//! Each session does one read-modify-write; NO_PRICE results are not stored.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use thiserror::Error;
use tracing::debug;

use binsignal_core::domain::{SessionLabel, Tally};

pub type DailyStats = BTreeMap<NaiveDate, BTreeMap<SessionLabel, Tally>>;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("stats file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize stats: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file. A missing file is an empty history.
    pub fn load(&self) -> Result<DailyStats, StatsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(DailyStats::new()),
            Err(source) => {
                return Err(StatsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(DailyStats::new());
        }
        serde_json::from_str(&content).map_err(|source| StatsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Add a session's wins and losses to the counters for `date`.
    pub fn record_session(
        &self,
        date: NaiveDate,
        label: SessionLabel,
        tally: &Tally,
    ) -> Result<(), StatsError> {
        let mut stats = self.load()?;
        let decided = Tally {
            wins: tally.wins,
            losses: tally.losses,
            no_price: 0,
        };
        stats
            .entry(date)
            .or_default()
            .entry(label)
            .or_default()
            .merge(&decided);
        self.save(&stats)?;
        debug!(path = %self.path.display(), %date, session = %label, "stats recorded");
        Ok(())
    }

    /// Per-day totals (all sessions summed) for the `days` days ending at
    /// `today`, oldest first. Days without sessions are omitted.
    pub fn recent_days(
        &self,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<(NaiveDate, Tally)>, StatsError> {
        let stats = self.load()?;
        let first = today - Duration::days(i64::from(days.max(1)) - 1);
        Ok(stats
            .range(first..=today)
            .map(|(date, sessions)| {
                let mut total = Tally::default();
                for tally in sessions.values() {
                    total.merge(tally);
                }
                (*date, total)
            })
            .collect())
    }

    /// Write via a sibling temp file and rename.
    fn save(&self, stats: &DailyStats) -> Result<(), StatsError> {
        let io_err = |source: io::Error| StatsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(stats)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}
