//! Telegram Bot API sink (`sendMessage`).

use super::{Message, NotificationSink, NotifyError};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

pub struct TelegramSink {
    client: reqwest::blocking::Client,
    token: String,
    chat_id: String,
}

impl TelegramSink {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, NotifyError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE_URL}/bot{}/sendMessage", self.token)
    }

    fn request<'a>(&'a self, message: &'a Message) -> SendMessageRequest<'a> {
        SendMessageRequest {
            chat_id: &self.chat_id,
            text: &message.text,
            parse_mode: message.format.parse_mode(),
            disable_web_page_preview: true,
        }
    }
}

impl NotificationSink for TelegramSink {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&self.request(message))
            .send()
            // reqwest errors embed the URL, which carries the bot token
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(kind = ?message.kind, "telegram message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{FormatHint, MessageKind};

    #[test]
    fn request_body_matches_bot_api() {
        let sink = TelegramSink::new("123:abc", "-10042").unwrap();
        let msg = Message::html(MessageKind::Greeting, "<b>hi</b>");
        let body = serde_json::to_value(sink.request(&msg)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "chat_id": "-10042",
                "text": "<b>hi</b>",
                "parse_mode": "HTML",
                "disable_web_page_preview": true
            })
        );
        assert_eq!(
            sink.endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn plain_messages_omit_parse_mode() {
        let sink = TelegramSink::new("t", "c").unwrap();
        let msg = Message {
            kind: MessageKind::Recap,
            text: "x".into(),
            format: FormatHint::Plain,
        };
        let body = serde_json::to_value(sink.request(&msg)).unwrap();
        assert!(body.get("parse_mode").is_none());
    }
}
