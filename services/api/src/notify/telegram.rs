//! Chat notifications through the Telegram Bot API

use async_trait::async_trait;
use serde::Serialize;

use super::{Notification, Notifier, NotifyError};
use crate::config::{Settings, non_empty};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Bot settings
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
}

impl TelegramConfig {
    /// `None` unless both the bot token and the chat id are set
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        Some(Self {
            bot_token: non_empty(&settings.telegram_bot_token)?,
            chat_id: non_empty(&settings.telegram_chat_id)?,
            api_base: TELEGRAM_API.to_string(),
        })
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// The request URL embeds the bot token, so it is stripped from transport errors
fn redact(error: reqwest::Error) -> NotifyError {
    NotifyError::Http(error.without_url())
}

/// Posts notifications to a chat via `sendMessage`
pub struct TelegramNotifier {
    client: reqwest::Client,
    url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!(
                "{}/bot{}/sendMessage",
                config.api_base.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: &notification.text,
            })
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected(format!("{status}: {body}")));
        }

        Ok(())
    }
}
