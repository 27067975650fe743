//! # Features
//!
//! Feature modules: reminders (storage-backed scheduling and delivery),
//! conversation (the multi-step creation flow), and chat (the cached
//! completion relay).

pub mod chat;
pub mod conversation;
pub mod reminders;

pub use chat::{CachedCompletion, CompletionClient, HttpCompletionClient, ResponseCache};
pub use conversation::{FlowState, ReminderFlow, SessionStore};
pub use reminders::{Reminder, ReminderScheduler, ReminderService};
