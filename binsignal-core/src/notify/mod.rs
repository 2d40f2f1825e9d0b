//! Notifications: the `NotificationSink` trait, its adapters, and message
//! formatting.
//!
//! Sinks report failures through `NotifyError`; callers log them and carry on.

pub mod format;
pub mod stdout;
pub mod telegram;

pub use stdout::StdoutSink;
pub use telegram::TelegramSink;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected by sink (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a message announces. Sinks may use it for filtering; tests use it to
/// count what a session emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Greeting,
    SessionStart,
    Signal,
    Outcome,
    NoSignals,
    SessionEnd,
    Recap,
}

/// How the sink should interpret `text`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatHint {
    #[default]
    Html,
    Plain,
}

impl FormatHint {
    /// Telegram `parse_mode`, if any.
    pub fn parse_mode(&self) -> Option<&'static str> {
        match self {
            FormatHint::Html => Some("HTML"),
            FormatHint::Plain => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    pub format: FormatHint,
}

impl Message {
    pub fn html(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            format: FormatHint::Html,
        }
    }
}

/// Destination for formatted messages.
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    fn send(&self, message: &Message) -> Result<(), NotifyError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        (**self).send(message)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        (**self).send(message)
    }
}
