//! Telegram Bot API transport.
//!
//! One blocking `sendMessage` call per message. Runs on the dispatcher
//! thread, so the request timeout bounds how long a slow API can hold up
//! the queue, never the sampling loop.

use std::time::Duration;

use eyre::WrapErr;
use gatekeeper_traits::{BoxError, Notifier};
use serde_json::json;

const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl TelegramNotifier {
    pub fn new(api_base: &str, token: &str, timeout: Duration) -> eyre::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("build Telegram HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{token}/sendMessage", api_base.trim_end_matches('/')),
        })
    }
}

impl core::fmt::Debug for TelegramNotifier {
    // The endpoint embeds the bot token.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TelegramNotifier").finish_non_exhaustive()
    }
}

/// Prefix `text` with the local wall-clock time.
pub fn stamped(text: &str) -> String {
    format!("{}\n{text}", chrono::Local::now().format(TIMESTAMP_FORMAT))
}

impl Notifier for TelegramNotifier {
    fn send(&mut self, recipient: &str, text: &str) -> Result<(), BoxError> {
        let body = json!({
            "chat_id": recipient,
            "parse_mode": "HTML",
            "text": stamped(text),
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(reqwest::Error::without_url)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let detail = resp.text().unwrap_or_default();
        Err(format!("Telegram API error (HTTP {}): {}", status.as_u16(), detail.trim()).into())
    }
}
