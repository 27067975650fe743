//! Outbound chat transport
//!
//! The rest of the bot talks to the chat platform through [`ChatTransport`],
//! so handlers and the poller can be exercised with a mock transport in
//! tests. The only concrete implementation is the Telegram Bot API client.

pub mod telegram;

pub use telegram::TelegramClient;

use async_trait::async_trait;

use crate::core::DeliveryError;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a plain message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), DeliveryError>;

    /// Send a message that prompts the user for input; `expect_reply` asks
    /// the platform to visually solicit a direct reply where supported.
    async fn prompt_reply(
        &self,
        chat_id: i64,
        text: &str,
        expect_reply: bool,
    ) -> Result<(), DeliveryError>;
}
