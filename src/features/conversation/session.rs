//! Per-chat flow session storage
//!
//! One state per chat; Idle is represented by absence. Entering a new flow
//! overwrites whatever was there, so flows never stack.

use dashmap::DashMap;
use std::sync::Arc;

/// Where a chat currently is in the reminder-creation flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Waiting for a DD.MM.YYYY date.
    AwaitingDate,
    /// Date accepted; waiting for the reminder body.
    AwaitingText { date: String },
}

/// Transient, in-process session store keyed by chat id. Cheap to clone; all
/// clones share the same map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<i64, FlowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    pub fn get(&self, chat_id: i64) -> Option<FlowState> {
        self.sessions.get(&chat_id).map(|entry| entry.clone())
    }

    pub fn set(&self, chat_id: i64, state: FlowState) {
        self.sessions.insert(chat_id, state);
    }

    /// Remove the chat's session, returning whether one existed.
    pub fn clear(&self, chat_id: i64) -> bool {
        self.sessions.remove(&chat_id).is_some()
    }

    pub fn is_active(&self, chat_id: i64) -> bool {
        self.sessions.contains_key(&chat_id)
    }
}
