//! # Reminders Feature
//!
//! One-shot, date-anchored reminders: creation, listing, and background
//! delivery by a recurring poller.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Random UUID record ids (timestamp ids collide under fast creation)
//! - 1.1.0: Per-item delivery timeout in the poller
//! - 1.0.0: Initial release with JSON-backed storage and a 60s poller

pub mod dates;
pub mod scheduler;
pub mod service;

pub use scheduler::ReminderScheduler;
pub use service::ReminderService;

use serde::{Deserialize, Serialize};

/// A durable reminder record.
///
/// `due_at` and `created_at` are kept as ISO-8601 text rather than parsed
/// timestamps: the display path must pass unparsable stored values through
/// untouched, and the persisted layout stays byte-compatible with data files
/// written by earlier versions of the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique opaque id, a random UUID generated at creation.
    pub id: String,
    /// Chat that owns the reminder and receives its delivery.
    #[serde(rename = "ownerId")]
    pub chat_id: i64,
    /// Due timestamp, ISO-8601, midnight of the day the user picked.
    #[serde(rename = "dueAt")]
    pub due_at: String,
    /// Free-form body, non-empty.
    pub text: String,
    /// False until the poller delivers it; transitions to true exactly once.
    pub delivered: bool,
    /// Informational creation timestamp, ISO-8601.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}
