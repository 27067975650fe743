// Core layer - configuration and error taxonomy
pub mod core;

// Features layer - all feature modules
pub mod features;

// Infrastructure - durable record storage and chat transport
pub mod storage;
pub mod transport;

// Application layer - message routing
pub mod commands;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items
pub use features::{
    // Chat relay
    CachedCompletion, CompletionClient, HttpCompletionClient, ResponseCache,
    // Conversation flow
    FlowState, ReminderFlow, SessionStore,
    // Reminders
    Reminder, ReminderScheduler, ReminderService,
};

pub use commands::MessageRouter;
pub use storage::JsonStore;
pub use transport::{ChatTransport, TelegramClient};
