//! Session labels — the two daily publishing windows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLabel {
    #[default]
    Morning,
    Evening,
}

impl SessionLabel {
    /// Lowercase key used in configuration and the statistics file.
    pub fn key(&self) -> &'static str {
        match self {
            SessionLabel::Morning => "morning",
            SessionLabel::Evening => "evening",
        }
    }

    /// Capitalised name used in messages.
    pub fn title(&self) -> &'static str {
        match self {
            SessionLabel::Morning => "Morning",
            SessionLabel::Evening => "Evening",
        }
    }
}

impl fmt::Display for SessionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SessionLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(SessionLabel::Morning),
            "evening" => Ok(SessionLabel::Evening),
            other => Err(format!("unknown session '{other}' (expected morning or evening)")),
        }
    }
}
