//! Message texts for every session event, in Telegram HTML.

use super::{Message, MessageKind};
use crate::domain::{Outcome, SessionLabel, Signal, Tally, TradeResult};
use chrono::NaiveDate;

const BRAND: &str = "Binary Signal";

/// Escape the characters Telegram's HTML mode treats as markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn greeting(label: SessionLabel) -> Message {
    let text = match label {
        SessionLabel::Morning => "☀️ <b><i>Good Morning Family</i></b>",
        SessionLabel::Evening => "🌙 <b><i>Good Evening Family</i></b>",
    };
    Message::html(MessageKind::Greeting, text)
}

pub fn session_start(label: SessionLabel) -> Message {
    Message::html(
        MessageKind::SessionStart,
        format!("<b>{} session starts</b>\n\n📡 <b>{BRAND}</b>", label.title()),
    )
}

/// Boxed signal card. `<pre>` keeps the box aligned in Telegram.
pub fn signal_card(signal: &Signal, expiry_minutes: u64) -> Message {
    let text = format!(
        "<pre>\
         ┏━━━━━━━━ SIGNAL ━━━━━━━━\n\
         ┃ Pair:      {pair}\n\
         ┃ Direction: {direction}\n\
         ┃ Expiry:    {expiry_minutes}m\n\
         ┃ Strategy:  {strategy} | TF: {tf}\n\
         ┗━━━━━━━━━━━━━━━━━━━━━━━━━\
         </pre>",
        pair = escape_html(&signal.display_name),
        direction = signal.direction,
        strategy = signal.strategy_label(),
        tf = signal.timeframe_used,
    );
    Message::html(MessageKind::Signal, text)
}

pub fn outcome(outcome: &Outcome) -> Message {
    let mut text = match outcome.result {
        TradeResult::Win => "✅ <b>Win</b>\nCongratulation 🎊".to_string(),
        TradeResult::Lose => "❌ <b>Lose</b>\nKeep studying and reviewing trades.".to_string(),
        TradeResult::NoPrice => "⚪ <b>Result:</b> NO_PRICE".to_string(),
    };
    if outcome.simulated {
        text.push_str("\n<i>(simulated result, demo mode)</i>");
    }
    Message::html(MessageKind::Outcome, text)
}

pub fn no_signals() -> Message {
    Message::html(
        MessageKind::NoSignals,
        "⚠️ <b>No reliable signals found this session.</b>",
    )
}

pub fn session_end(label: SessionLabel) -> Message {
    Message::html(
        MessageKind::SessionEnd,
        format!("<b>{} session ends</b> ✅", label.title()),
    )
}

/// Per-day win/loss summary, oldest first, with an overall win rate.
pub fn recap(days: &[(NaiveDate, Tally)]) -> Message {
    if days.is_empty() {
        return Message::html(MessageKind::Recap, "📊 <b>Recap</b>\nNo recorded sessions yet.");
    }

    let mut total = Tally::default();
    let mut rows = String::new();
    for (date, tally) in days {
        total.merge(tally);
        rows.push_str(&format!("{date}  W {:>2}  L {:>2}\n", tally.wins, tally.losses));
    }
    let rate = total
        .win_rate()
        .map(|r| format!("{r:.1}%"))
        .unwrap_or_else(|| "n/a".to_string());

    Message::html(
        MessageKind::Recap,
        format!(
            "📊 <b>Recap ({} days)</b>\n<pre>{rows}</pre>\nTotal: <b>{}W / {}L</b> ({rate})",
            days.len(),
            total.wins,
            total.losses,
        ),
    )
}
