//! Background delivery poller
//!
//! A recurring task that queries due reminders and dispatches them to their
//! owning chats. Delivery is at-least-once: when a reminder is sent but
//! marking it delivered fails, the next tick sends it again.

use chrono::Local;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, sleep, timeout, MissedTickBehavior};

use super::{dates, Reminder, ReminderService};
use crate::core::DeliveryError;
use crate::transport::ChatTransport;

/// How often due reminders are checked.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Delay before the first check after startup.
pub const DEFAULT_FIRST_DELAY: Duration = Duration::from_secs(10);

/// Upper bound on a single delivery call; a send that never returns must not
/// stall the whole tick.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReminderScheduler {
    service: ReminderService,
    transport: Arc<dyn ChatTransport>,
    poll_interval: Duration,
    first_delay: Duration,
}

impl ReminderScheduler {
    pub fn new(service: ReminderService, transport: Arc<dyn ChatTransport>) -> Self {
        ReminderScheduler {
            service,
            transport,
            poll_interval: DEFAULT_POLL_INTERVAL,
            first_delay: DEFAULT_FIRST_DELAY,
        }
    }

    pub fn with_timing(mut self, poll_interval: Duration, first_delay: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.first_delay = first_delay;
        self
    }

    /// Drive the poller until the process shuts down. Ticks never overlap:
    /// the next one is not scheduled until the current one has finished.
    pub async fn run(self) {
        sleep(self.first_delay).await;
        info!(
            "reminder poller started, checking every {:?}",
            self.poll_interval
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick(Local::now().naive_local()).await;
        }
    }

    /// One delivery pass. Failures are isolated per reminder: a chat that
    /// cannot be reached never blocks the rest of the batch.
    pub async fn tick(&self, now: chrono::NaiveDateTime) {
        let due = match self.service.list_due(now).await {
            Ok(due) => due,
            Err(e) => {
                error!("could not read due reminders: {e}");
                return;
            }
        };

        for reminder in due {
            if self.dispatch(&reminder).await {
                match self.service.mark_delivered(&reminder.id).await {
                    Ok(true) => info!("delivered reminder {} to chat {}", reminder.id, reminder.chat_id),
                    Ok(false) => warn!("reminder {} disappeared before it was marked delivered", reminder.id),
                    Err(e) => warn!(
                        "delivered reminder {} but failed to mark it: {e}; it will be re-sent next tick",
                        reminder.id
                    ),
                }
            }
        }
    }

    async fn dispatch(&self, reminder: &Reminder) -> bool {
        let message = format!(
            "🔔 Reminder: {}\n⏰ Scheduled for: {}",
            reminder.text,
            dates::format_for_display(&reminder.due_at)
        );
        match timeout(
            DELIVERY_TIMEOUT,
            self.transport.send_message(reminder.chat_id, &message),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("failed to deliver reminder {}: {e}", reminder.id);
                false
            }
            Err(_) => {
                let e = DeliveryError::Timeout(DELIVERY_TIMEOUT);
                error!("failed to deliver reminder {}: {e}", reminder.id);
                false
            }
        }
    }
}
