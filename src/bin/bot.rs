use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use pomni::commands::MessageRouter;
use pomni::core::Config;
use pomni::features::chat::{CachedCompletion, CompletionClient, HttpCompletionClient, ResponseCache};
use pomni::features::conversation::{ReminderFlow, SessionStore};
use pomni::features::reminders::{ReminderScheduler, ReminderService};
use pomni::storage::JsonStore;
use pomni::transport::{ChatTransport, TelegramClient};

/// How long each getUpdates long-poll waits on the server side.
const UPDATE_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause before retrying after a failed getUpdates call.
const UPDATE_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    info!("starting bot, storage at {}", config.storage_path.display());

    let store = Arc::new(JsonStore::open(&config.storage_path).await?);
    let service = ReminderService::new(store);
    let flow = ReminderFlow::new(SessionStore::new(), service.clone());

    let telegram = Arc::new(TelegramClient::new(&config.telegram_token));
    let transport: Arc<dyn ChatTransport> = telegram.clone();

    let completion: Arc<dyn CompletionClient> = Arc::new(CachedCompletion::new(
        HttpCompletionClient::new(
            &config.completion_endpoint,
            &config.completion_api_key,
            &config.completion_model,
        ),
        ResponseCache::new(config.cache_ttl, config.cache_capacity),
    ));

    let scheduler = ReminderScheduler::new(service.clone(), transport.clone())
        .with_timing(config.poll_interval, config.poll_first_delay);
    tokio::spawn(scheduler.run());

    if let Some(admin) = config.admin_chat_id {
        if let Err(e) = transport
            .send_message(admin, "✅ Bot is up and ready")
            .await
        {
            warn!("could not notify admin chat {admin}: {e}");
        }
    }

    let router = MessageRouter::new(flow, service, completion, transport);

    info!("entering update loop");
    let mut offset = 0i64;
    loop {
        match telegram.get_updates(offset, UPDATE_POLL_TIMEOUT).await {
            Ok(updates) => {
                for update in updates {
                    offset = offset.max(update.update_id + 1);
                    let Some(message) = update.message else { continue };
                    let Some(text) = message.text else { continue };
                    if let Err(e) = router.dispatch(message.chat.id, &text).await {
                        error!("handler failure for chat {}: {e:#}", message.chat.id);
                    }
                }
            }
            Err(e) => {
                error!("getUpdates failed: {e}");
                sleep(UPDATE_RETRY_DELAY).await;
            }
        }
    }
}
