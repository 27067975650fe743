//! Telegram Bot API client
//!
//! Thin reqwest wrapper over `sendMessage` and long-polling `getUpdates`.

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::ChatTransport;
use crate::core::DeliveryError;

const API_BASE: &str = "https://api.telegram.org";

/// Extra slack on top of the long-poll timeout before reqwest gives up.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Upper bound on a single outbound send.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

/// Envelope every Bot API response arrives in.
#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
    result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        TelegramClient {
            http: reqwest::Client::new(),
            base_url: format!("{API_BASE}/bot{token}"),
        }
    }

    async fn call(
        &self,
        method: &str,
        payload: Value,
        timeout: Duration,
    ) -> Result<Value, DeliveryError> {
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .timeout(timeout)
            .json(&payload)
            .send()
            .await?;

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(DeliveryError::Api(
                body.description
                    .unwrap_or_else(|| format!("{method} failed without a description")),
            ));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }

    /// Long-poll for updates after `offset`, waiting up to `poll_timeout`.
    pub async fn get_updates(
        &self,
        offset: i64,
        poll_timeout: Duration,
    ) -> Result<Vec<Update>, DeliveryError> {
        let result = self
            .call(
                "getUpdates",
                json!({
                    "offset": offset,
                    "timeout": poll_timeout.as_secs(),
                    "allowed_updates": ["message"],
                }),
                poll_timeout + HTTP_TIMEOUT_SLACK,
            )
            .await?;

        let updates: Vec<Update> = serde_json::from_value(result)?;
        if !updates.is_empty() {
            debug!("received {} update(s)", updates.len());
        }
        Ok(updates)
    }

    async fn send(&self, chat_id: i64, text: &str, force_reply: bool) -> Result<(), DeliveryError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if force_reply {
            payload["reply_markup"] = json!({ "force_reply": true, "selective": true });
        }
        self.call("sendMessage", payload, SEND_TIMEOUT).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError> {
        self.send(chat_id, text, false).await
    }

    async fn prompt_reply(
        &self,
        chat_id: i64,
        text: &str,
        expect_reply: bool,
    ) -> Result<(), DeliveryError> {
        self.send(chat_id, text, expect_reply).await
    }
}
