//! # Conversation Feature
//!
//! Per-chat multi-step flow for creating a reminder: a date step followed by
//! a free-text step, validated and committed through the reminder service.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Session state moved out of a process-wide map into SessionStore
//! - 1.0.0: Initial release with the date/text two-step flow

pub mod flow;
pub mod session;

pub use flow::ReminderFlow;
pub use session::{FlowState, SessionStore};
