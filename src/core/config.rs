//! Environment-backed configuration
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! the binary before this runs). Only the Telegram token and the completion
//! API key are mandatory; everything else has a sensible default.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the durable reminder set.
pub const DEFAULT_STORAGE_PATH: &str = "data/reminders.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token.
    pub telegram_token: String,

    /// Chat-completion endpoint and credentials.
    pub completion_endpoint: String,
    pub completion_api_key: String,
    pub completion_model: String,

    /// Path of the JSON file holding the reminder records.
    pub storage_path: PathBuf,

    /// Delivery poller timing.
    pub poll_interval: Duration,
    pub poll_first_delay: Duration,

    /// Completion response cache.
    pub cache_ttl: Duration,
    pub cache_capacity: usize,

    /// Chat that receives the startup notification, if set.
    pub admin_chat_id: Option<i64>,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let config = Config {
            telegram_token: env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            completion_endpoint: env::var("COMPLETION_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            completion_api_key: env::var("COMPLETION_API_KEY").unwrap_or_default(),
            completion_model: env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            storage_path: env::var("STORAGE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string())
                .into(),
            poll_interval: Duration::from_secs(parse_var("POLL_INTERVAL_SECS", 60)?),
            poll_first_delay: Duration::from_secs(parse_var("POLL_FIRST_DELAY_SECS", 10)?),
            cache_ttl: Duration::from_secs(parse_var("CACHE_TTL_SECS", 3600)?),
            cache_capacity: parse_var("CACHE_CAPACITY", 1000)? as usize,
            admin_chat_id: match env::var("ADMIN_CHAT_ID") {
                Ok(raw) => Some(raw.parse().context("ADMIN_CHAT_ID must be an integer")?),
                Err(_) => None,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly run.
    fn validate(&self) -> Result<()> {
        if self.telegram_token.is_empty() {
            bail!("TELEGRAM_BOT_TOKEN is not set");
        }
        if self.completion_api_key.is_empty() {
            bail!("COMPLETION_API_KEY is not set");
        }
        if self.poll_interval.is_zero() {
            bail!("POLL_INTERVAL_SECS must be greater than zero");
        }
        Ok(())
    }
}

fn parse_var(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
