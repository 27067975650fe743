//! Message routing
//!
//! Maps incoming commands onto the reminder flow and service, and relays
//! ordinary chat text to the completion API. While a chat is mid-flow,
//! everything that is not a command feeds the flow, pre-empting the
//! completion path.

use anyhow::Result;
use log::{debug, error};
use std::sync::Arc;

use crate::features::chat::CompletionClient;
use crate::features::conversation::ReminderFlow;
use crate::features::reminders::ReminderService;
use crate::transport::ChatTransport;

const WELCOME: &str = "👋 Hi! I can do two things:\n\n\
    🤖 answer your questions\n\
    ⏰ keep one-shot reminders\n\n\
    📌 Commands:\n\
    /help - how to use me\n\
    /set_reminder - create a reminder\n\
    /my_reminders - your active reminders";

const HELP: &str = "📖 How to use this bot:\n\n\
    1. Just write me a question to get an answer\n\n\
    2. For reminders:\n\
       /set_reminder - create a new one\n\
       /my_reminders - list active ones\n\
       /delete <id> - remove one\n\n\
    3. /cancel - abort the current action";

const REPLY_FLOW_OPEN: &str = "Finish the current action or cancel it with /cancel";
const REPLY_CHAT_FAILED: &str = "Something went wrong. Please try again later.";
const REPLY_NO_REMINDERS: &str = "📋 You have no active reminders";

pub struct MessageRouter {
    flow: ReminderFlow,
    service: ReminderService,
    completion: Arc<dyn CompletionClient>,
    transport: Arc<dyn ChatTransport>,
}

impl MessageRouter {
    pub fn new(
        flow: ReminderFlow,
        service: ReminderService,
        completion: Arc<dyn CompletionClient>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        MessageRouter {
            flow,
            service,
            completion,
            transport,
        }
    }

    /// Handle one incoming message from `chat_id`.
    pub async fn dispatch(&self, chat_id: i64, text: &str) -> Result<()> {
        let text = text.trim();
        match text {
            "" => Ok(()),
            "/start" => self.reply(chat_id, WELCOME).await,
            "/help" => self.reply(chat_id, HELP).await,
            "/set_reminder" => {
                let prompt = self.flow.begin(chat_id);
                self.transport.prompt_reply(chat_id, &prompt, true).await?;
                Ok(())
            }
            "/cancel" => {
                let reply = self.flow.cancel(chat_id);
                self.reply(chat_id, &reply).await
            }
            "/my_reminders" => self.list_reminders(chat_id).await,
            _ if text.starts_with("/delete") => self.delete_reminder(chat_id, text).await,
            _ if text.starts_with('/') => {
                debug!("ignoring unknown command {text:?} from chat {chat_id}");
                Ok(())
            }
            _ if self.flow.is_active(chat_id) => {
                let reply = self.flow.on_message(chat_id, text).await;
                if self.flow.is_active(chat_id) {
                    // Mid-flow prompts solicit a direct reply.
                    self.transport.prompt_reply(chat_id, &reply, true).await?;
                } else {
                    self.transport.send_message(chat_id, &reply).await?;
                }
                Ok(())
            }
            _ => self.relay_to_completion(chat_id, text).await,
        }
    }

    async fn list_reminders(&self, chat_id: i64) -> Result<()> {
        let reminders = match self.service.list_active(chat_id).await {
            Ok(reminders) => reminders,
            Err(e) => {
                error!("could not list reminders for chat {chat_id}: {e}");
                return self.reply(chat_id, "❌ Could not read your reminders").await;
            }
        };

        if reminders.is_empty() {
            return self.reply(chat_id, REPLY_NO_REMINDERS).await;
        }

        let mut message = String::from("📋 Your reminders:\n\n");
        for (i, reminder) in reminders.iter().enumerate() {
            message.push_str(&format!(
                "{}. {} - {}\n   id: {}\n",
                i + 1,
                self.service.format_for_display(&reminder.due_at),
                reminder.text,
                reminder.id
            ));
        }
        self.reply(chat_id, &message).await
    }

    async fn delete_reminder(&self, chat_id: i64, text: &str) -> Result<()> {
        let id = text.trim_start_matches("/delete").trim();
        if id.is_empty() {
            return self.reply(chat_id, "Usage: /delete <id>").await;
        }

        match self.service.delete(id).await {
            Ok(true) => self.reply(chat_id, "✅ Reminder deleted").await,
            Ok(false) => self.reply(chat_id, "❌ No reminder with that id").await,
            Err(e) => {
                error!("could not delete reminder {id} for chat {chat_id}: {e}");
                self.reply(chat_id, "❌ Could not delete the reminder").await
            }
        }
    }

    async fn relay_to_completion(&self, chat_id: i64, text: &str) -> Result<()> {
        // A half-finished reminder flow swallows ordinary chat.
        if self.flow.is_active(chat_id) {
            return self.reply(chat_id, REPLY_FLOW_OPEN).await;
        }

        match self.completion.complete(text).await {
            Ok(answer) => self.reply(chat_id, &answer).await,
            Err(e) => {
                error!("completion failed for chat {chat_id}: {e:#}");
                self.reply(chat_id, REPLY_CHAT_FAILED).await
            }
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) -> Result<()> {
        self.transport.send_message(chat_id, text).await?;
        Ok(())
    }
}
