//! Reminder domain operations over the record store

use chrono::{Local, NaiveDateTime};
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use super::{dates, Reminder};
use crate::core::{ReminderError, StorageError};
use crate::storage::JsonStore;

/// Domain operations for reminders. Cheap to clone; all clones share one
/// store.
#[derive(Clone)]
pub struct ReminderService {
    store: Arc<JsonStore<Reminder>>,
}

impl ReminderService {
    pub fn new(store: Arc<JsonStore<Reminder>>) -> Self {
        ReminderService { store }
    }

    /// Create a reminder for `chat_id` due on the day named by `date_text`
    /// (DD.MM.YYYY). The date must be strictly after the current wall-clock
    /// time, which rules out today: the due instant is midnight of the
    /// chosen day.
    pub async fn create(
        &self,
        chat_id: i64,
        date_text: &str,
        text: &str,
    ) -> Result<Reminder, ReminderError> {
        let due = dates::parse_input(date_text).ok_or(ReminderError::InvalidDateFormat)?;
        let now = Local::now().naive_local();
        if due <= now {
            return Err(ReminderError::DateNotInFuture);
        }

        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            chat_id,
            due_at: dates::to_stored(due),
            text: text.to_string(),
            delivered: false,
            created_at: dates::to_stored(now),
        };
        self.store.append(reminder.clone()).await?;
        info!(
            "created reminder {} for chat {} due {}",
            reminder.id, chat_id, reminder.due_at
        );
        Ok(reminder)
    }

    /// Active reminders for one chat: undelivered with a due time still in
    /// the future. Returned in insertion order, not sorted by due date.
    pub async fn list_active(&self, chat_id: i64) -> Result<Vec<Reminder>, StorageError> {
        let now = Local::now().naive_local();
        let records = self.store.read_all().await?;
        Ok(records
            .into_iter()
            .filter(|r| {
                r.chat_id == chat_id
                    && !r.delivered
                    && dates::parse_stored(&r.due_at).is_some_and(|due| due > now)
            })
            .collect())
    }

    /// Undelivered reminders across all chats whose due time has passed.
    /// A record whose stored due time no longer parses is never due.
    pub async fn list_due(&self, now: NaiveDateTime) -> Result<Vec<Reminder>, StorageError> {
        let records = self.store.read_all().await?;
        Ok(records
            .into_iter()
            .filter(|r| {
                !r.delivered && dates::parse_stored(&r.due_at).is_some_and(|due| due <= now)
            })
            .collect())
    }

    /// Mark the reminder with `id` as delivered. Returns whether a matching
    /// record exists; marking an already-delivered record is a no-op
    /// success.
    pub async fn mark_delivered(&self, id: &str) -> Result<bool, StorageError> {
        let updated = self
            .store
            .update_where(|r| r.id == id, |r| r.delivered = true)
            .await?;
        Ok(updated > 0)
    }

    /// Delete the reminder with `id`, returning whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let removed = self.store.remove_where(|r| r.id == id).await?;
        Ok(removed > 0)
    }

    /// Render a stored due timestamp as DD.MM.YYYY, passing unparsable
    /// values through untouched.
    pub fn format_for_display(&self, stored: &str) -> String {
        dates::format_for_display(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn service(dir: &tempfile::TempDir) -> ReminderService {
        let store = JsonStore::open(dir.path().join("reminders.json"))
            .await
            .unwrap();
        ReminderService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_create_future_date() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let reminder = svc.create(7, "01.01.2099", "Buy milk").await.unwrap();
        assert_eq!(reminder.chat_id, 7);
        assert_eq!(reminder.due_at, "2099-01-01T00:00:00");
        assert_eq!(reminder.text, "Buy milk");
        assert!(!reminder.delivered);
        assert!(reminder.created_at < reminder.due_at);
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let a = svc.create(1, "01.01.2099", "a").await.unwrap();
        let b = svc.create(1, "01.01.2099", "b").await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        assert!(matches!(
            svc.create(1, "2099-01-01", "x").await,
            Err(ReminderError::InvalidDateFormat)
        ));
        assert!(matches!(
            svc.create(1, "abc", "x").await,
            Err(ReminderError::InvalidDateFormat)
        ));
        assert!(matches!(
            svc.create(1, "01.01.2020", "x").await,
            Err(ReminderError::DateNotInFuture)
        ));

        // None of the rejected inputs created a record.
        assert!(svc.list_active(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_active_filters_owner_and_status() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let mine = svc.create(1, "01.01.2099", "mine").await.unwrap();
        svc.create(2, "01.01.2099", "theirs").await.unwrap();
        let delivered = svc.create(1, "02.01.2099", "done").await.unwrap();
        svc.mark_delivered(&delivered.id).await.unwrap();

        let active = svc.list_active(1).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, mine.id);
    }

    #[tokio::test]
    async fn test_list_due_filters_by_time_and_status() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let due = svc.create(1, "01.06.2099", "due").await.unwrap();
        let later = svc.create(2, "01.06.2100", "later").await.unwrap();

        let now = dates::parse_input("02.06.2099").unwrap();
        let pending = svc.list_due(now).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, due.id);

        // A delivered record is never due again, whatever the clock says.
        svc.mark_delivered(&due.id).await.unwrap();
        assert!(svc.list_due(now).await.unwrap().is_empty());

        let far = dates::parse_input("01.01.2200").unwrap();
        let pending = svc.list_due(far).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, later.id);
    }

    #[tokio::test]
    async fn test_mark_delivered_is_idempotent() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let reminder = svc.create(1, "01.01.2099", "x").await.unwrap();
        assert!(svc.mark_delivered(&reminder.id).await.unwrap());
        assert!(svc.mark_delivered(&reminder.id).await.unwrap());
        assert!(!svc.mark_delivered("no-such-id").await.unwrap());

        let now = dates::parse_input("01.01.2200").unwrap();
        assert!(svc.list_due(now).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempdir().unwrap();
        let svc = service(&dir).await;

        let reminder = svc.create(1, "01.01.2099", "x").await.unwrap();
        assert!(svc.delete(&reminder.id).await.unwrap());
        assert!(!svc.delete(&reminder.id).await.unwrap());
        assert!(svc.list_active(1).await.unwrap().is_empty());
    }
}
