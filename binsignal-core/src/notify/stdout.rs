//! Sink that writes messages to stdout, for dry runs.

use super::{FormatHint, Message, NotificationSink, NotifyError};
use std::io::Write;

/// Prints each message, with HTML tags stripped, followed by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}\n", render_plain(message))?;
        Ok(())
    }
}

/// Message text as it would read without markup.
pub fn render_plain(message: &Message) -> String {
    match message.format {
        FormatHint::Plain => message.text.clone(),
        FormatHint::Html => strip_tags(&message.text),
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MessageKind;

    #[test]
    fn strips_markup_and_unescapes() {
        let msg = Message::html(MessageKind::Outcome, "<b>Win</b> &amp; <i>done</i> &lt;3");
        assert_eq!(render_plain(&msg), "Win & done <3");
    }

    #[test]
    fn plain_text_is_untouched() {
        let msg = Message {
            kind: MessageKind::Recap,
            text: "<not a tag>".into(),
            format: FormatHint::Plain,
        };
        assert_eq!(render_plain(&msg), "<not a tag>");
    }
}
