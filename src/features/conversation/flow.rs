//! The reminder-creation flow
//!
//! State transitions:
//!
//! ```text
//! Idle --/set_reminder--> AwaitingDate --valid future date--> AwaitingText --text--> Idle
//!                            |  bad format: re-prompt, stay      |
//!                            |  past date: abort to Idle         | commit via ReminderService
//!                          /cancel from any state --> Idle
//! ```
//!
//! Every step returns the reply to show the user; the caller owns actually
//! sending it. Storage failures during the commit clear the flow rather than
//! leaving the chat stuck mid-conversation.

use chrono::Local;
use log::error;

use super::session::{FlowState, SessionStore};
use crate::core::ReminderError;
use crate::features::reminders::{dates, ReminderService};

pub const PROMPT_DATE: &str = "📅 Enter a date as DD.MM.YYYY (for example, 25.12.2024):";
pub const PROMPT_TEXT: &str = "✏️ Enter the reminder text:";
pub const REPLY_BAD_DATE: &str = "❌ Invalid date format. Use DD.MM.YYYY";
pub const REPLY_PAST_DATE: &str = "❌ The date must be in the future";
pub const REPLY_EMPTY_TEXT: &str = "❌ The reminder text cannot be empty. Try again:";
pub const REPLY_CREATE_FAILED: &str = "❌ Could not create the reminder. Please try again later.";
pub const REPLY_CANCELLED: &str = "Current action cancelled";
pub const REPLY_NOTHING_TO_CANCEL: &str = "Nothing to cancel";

pub struct ReminderFlow {
    sessions: SessionStore,
    service: ReminderService,
}

impl ReminderFlow {
    pub fn new(sessions: SessionStore, service: ReminderService) -> Self {
        ReminderFlow { sessions, service }
    }

    /// Whether the chat is mid-flow. The router uses this to pre-empt the
    /// chat-completion path while a flow is open.
    pub fn is_active(&self, chat_id: i64) -> bool {
        self.sessions.is_active(chat_id)
    }

    /// Enter the flow, replacing any previous state for this chat.
    pub fn begin(&self, chat_id: i64) -> String {
        self.sessions.set(chat_id, FlowState::AwaitingDate);
        PROMPT_DATE.to_string()
    }

    /// Cancel from any state.
    pub fn cancel(&self, chat_id: i64) -> String {
        if self.sessions.clear(chat_id) {
            REPLY_CANCELLED.to_string()
        } else {
            REPLY_NOTHING_TO_CANCEL.to_string()
        }
    }

    /// Feed one message into the flow and get the reply to show.
    pub async fn on_message(&self, chat_id: i64, text: &str) -> String {
        match self.sessions.get(chat_id) {
            Some(FlowState::AwaitingDate) => self.date_step(chat_id, text),
            Some(FlowState::AwaitingText { date }) => self.text_step(chat_id, &date, text).await,
            None => "Start creating a reminder with /set_reminder".to_string(),
        }
    }

    fn date_step(&self, chat_id: i64, text: &str) -> String {
        let due = match dates::parse_input(text) {
            Some(due) => due,
            // Stay in AwaitingDate so the user can correct the format.
            None => return REPLY_BAD_DATE.to_string(),
        };

        if due <= Local::now().naive_local() {
            // A past date aborts the whole flow.
            self.sessions.clear(chat_id);
            return REPLY_PAST_DATE.to_string();
        }

        self.sessions.set(
            chat_id,
            FlowState::AwaitingText {
                date: text.trim().to_string(),
            },
        );
        PROMPT_TEXT.to_string()
    }

    async fn text_step(&self, chat_id: i64, date: &str, text: &str) -> String {
        let text = text.trim();
        if text.is_empty() {
            // The body must be non-empty; stay in AwaitingText.
            return REPLY_EMPTY_TEXT.to_string();
        }

        // Terminal either way: the flow never survives the commit attempt.
        self.sessions.clear(chat_id);

        match self.service.create(chat_id, date, text).await {
            Ok(reminder) => format!(
                "✅ Reminder created!\n\n📅 Date: {}\n📝 Text: {}",
                self.service.format_for_display(&reminder.due_at),
                reminder.text
            ),
            Err(ReminderError::InvalidDateFormat) => REPLY_BAD_DATE.to_string(),
            Err(ReminderError::DateNotInFuture) => REPLY_PAST_DATE.to_string(),
            Err(ReminderError::Storage(e)) => {
                error!("storage failure creating reminder for chat {chat_id}: {e}");
                REPLY_CREATE_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonStore;
    use std::sync::Arc;
    use tempfile::tempdir;

    async fn flow(dir: &tempfile::TempDir) -> (ReminderFlow, ReminderService) {
        let store = JsonStore::open(dir.path().join("reminders.json"))
            .await
            .unwrap();
        let service = ReminderService::new(Arc::new(store));
        (
            ReminderFlow::new(SessionStore::new(), service.clone()),
            service,
        )
    }

    #[tokio::test]
    async fn test_happy_path_creates_reminder() {
        let dir = tempdir().unwrap();
        let (flow, service) = flow(&dir).await;

        assert_eq!(flow.begin(7), PROMPT_DATE);
        assert_eq!(flow.on_message(7, "01.01.2099").await, PROMPT_TEXT);

        let reply = flow.on_message(7, "Buy milk").await;
        assert!(reply.contains("01.01.2099"));
        assert!(reply.contains("Buy milk"));
        assert!(!flow.is_active(7));

        let active = service.list_active(7).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "Buy milk");
    }

    #[tokio::test]
    async fn test_bad_date_reprompts_past_date_aborts() {
        let dir = tempdir().unwrap();
        let (flow, service) = flow(&dir).await;

        flow.begin(7);
        assert_eq!(flow.on_message(7, "not-a-date").await, REPLY_BAD_DATE);
        // Still awaiting a date: no state was lost.
        assert!(flow.is_active(7));

        assert_eq!(flow.on_message(7, "01.01.2020").await, REPLY_PAST_DATE);
        assert!(!flow.is_active(7));
        assert!(service.list_active(7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_from_each_state() {
        let dir = tempdir().unwrap();
        let (flow, _service) = flow(&dir).await;

        assert_eq!(flow.cancel(7), REPLY_NOTHING_TO_CANCEL);

        flow.begin(7);
        assert_eq!(flow.cancel(7), REPLY_CANCELLED);
        assert!(!flow.is_active(7));

        flow.begin(7);
        flow.on_message(7, "01.01.2099").await;
        assert_eq!(flow.cancel(7), REPLY_CANCELLED);
        assert!(!flow.is_active(7));
    }

    #[tokio::test]
    async fn test_empty_text_reprompts() {
        let dir = tempdir().unwrap();
        let (flow, service) = flow(&dir).await;

        flow.begin(7);
        flow.on_message(7, "01.01.2099").await;
        assert_eq!(flow.on_message(7, "   ").await, REPLY_EMPTY_TEXT);
        assert!(flow.is_active(7));

        flow.on_message(7, "water the plants").await;
        assert_eq!(service.list_active(7).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_clears_flow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reminders.json");
        let store = JsonStore::open(&path).await.unwrap();
        let service = ReminderService::new(Arc::new(store));
        let flow = ReminderFlow::new(SessionStore::new(), service);

        flow.begin(7);
        flow.on_message(7, "01.01.2099").await;

        // Corrupt the backing file so the commit fails inside the store.
        std::fs::write(&path, b"{ not json").unwrap();

        assert_eq!(flow.on_message(7, "Buy milk").await, REPLY_CREATE_FAILED);
        // The chat is not left stuck mid-flow.
        assert!(!flow.is_active(7));
    }

    #[tokio::test]
    async fn test_restart_overwrites_previous_flow() {
        let dir = tempdir().unwrap();
        let (flow, _service) = flow(&dir).await;

        flow.begin(7);
        flow.on_message(7, "01.01.2099").await;
        // Entering again drops the half-finished flow.
        assert_eq!(flow.begin(7), PROMPT_DATE);
        assert_eq!(flow.on_message(7, "not-a-date").await, REPLY_BAD_DATE);
    }

    #[tokio::test]
    async fn test_flows_do_not_cross_chats() {
        let dir = tempdir().unwrap();
        let (flow, service) = flow(&dir).await;

        flow.begin(1);
        flow.begin(2);
        flow.on_message(1, "01.01.2099").await;

        flow.on_message(1, "for chat one").await;
        assert!(flow.is_active(2));
        assert!(service.list_active(2).await.unwrap().is_empty());
        assert_eq!(service.list_active(1).await.unwrap().len(), 1);
    }
}
