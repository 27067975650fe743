//! Error taxonomy shared across the bot
//!
//! Storage and delivery failures are per-call and non-fatal: callers receive
//! an explicit failure signal and decide how to degrade, the process never
//! terminates because of them.

use std::time::Duration;
use thiserror::Error;

/// Failure while reading or writing the durable record set.
///
/// The store guarantees that on any of these the previous durable state is
/// left intact.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Failure while creating a reminder.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// User input does not match DD.MM.YYYY or names an impossible calendar day.
    #[error("invalid date format, expected DD.MM.YYYY")]
    InvalidDateFormat,

    /// Valid format, but the date is not strictly after the current wall-clock time.
    #[error("date must be in the future")]
    DateNotInFuture,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure delivering a message to a chat. Always scoped to a single
/// message: the poller logs it and moves on to the next item.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat API rejected the call: {0}")]
    Api(String),

    #[error("malformed chat API payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
}
