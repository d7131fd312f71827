use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use wheelbot_logging::Logger;
use wheelbot_telegram::{TelegramClient, Update};

use crate::bot::Dispatcher;
use crate::config::Settings;
use crate::{build_dispatcher, identify_bot, shutdown_signal};

/// Exponential delay between failed polls
#[derive(Debug)]
pub struct Backoff {
    current: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            current: initial,
            max,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self, initial: Duration) {
        self.current = initial;
    }
}

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

pub async fn handle_poll_command(settings: Settings, logger: Arc<Logger>) -> Result<()> {
    let token = settings.require_token()?;
    let client =
        Arc::new(TelegramClient::new(token).with_base_url(settings.telegram.api_url.as_str()));

    identify_bot(&client).await?;

    // getUpdates is refused while a webhook is set
    if let Err(e) = client.delete_webhook(false).await {
        warn!(error = %e, "deleteWebhook failed");
    }

    let dispatcher = build_dispatcher(&settings, client.clone(), logger);
    let timeout = settings.telegram.poll_timeout_secs;
    let mut offset: Option<i64> = None;
    let mut backoff = Backoff::new(INITIAL_BACKOFF, MAX_BACKOFF);

    eprintln!(
        "  {} Polling for updates, press {} to stop",
        "->".bright_green(),
        "Ctrl+C".bold()
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = client.get_updates(offset, timeout) => polled,
        };

        match polled {
            Ok(updates) => {
                backoff.reset(INITIAL_BACKOFF);
                if let Some(last) = updates.iter().map(|u| u.update_id).max() {
                    offset = Some(last + 1);
                }
                dispatch_batch(&dispatcher, updates).await;
            }
            Err(e) => {
                let delay = backoff.next_delay();
                warn!(error = %e, retry_in_secs = delay.as_secs(), "getUpdates failed");
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }

    info!("Polling stopped");
    Ok(())
}

/// Handle one batch: users run in parallel, each user's updates in order.
pub async fn dispatch_batch(dispatcher: &Arc<Dispatcher>, updates: Vec<Update>) {
    let mut queues: HashMap<Option<i64>, Vec<Update>> = HashMap::new();
    for update in updates {
        let sender = update.message.as_ref().map(|m| m.sender_id());
        queues.entry(sender).or_default().push(update);
    }

    let mut tasks = JoinSet::new();
    for queue in queues.into_values() {
        let dispatcher = Arc::clone(dispatcher);
        tasks.spawn(async move {
            for update in queue {
                let update_id = update.update_id;
                if let Err(e) = dispatcher.handle_update(update).await {
                    error!(update_id, error = %format!("{:#}", e), "Failed to handle update");
                }
            }
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "Update task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheelbot_chart::{ChartOptions, ChartRenderer, RenderSettings};
    use wheelbot_core::{InMemorySessionStore, SessionStore, SurveyEngine, UserId};
    use wheelbot_logging::LogFormat;

    use crate::testing::{text_update, FakeMessenger};

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(5));
        let delays: Vec<u64> = (0..5).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);

        backoff.reset(Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_batch_keeps_per_user_order() {
        let store = Arc::new(InMemorySessionStore::<ChartOptions>::new());
        let dispatcher = Arc::new(Dispatcher::new(
            SurveyEngine::new(store.clone(), ChartOptions::default()),
            Arc::new(FakeMessenger::default()),
            Arc::new(ChartRenderer::new(RenderSettings::default())),
            Arc::new(Logger::new(LogFormat::Compact)),
        ));

        let batch = vec![
            text_update(1, "/start"),
            text_update(2, "/start"),
            text_update(1, "4"),
            text_update(2, "0"),
            text_update(1, "2"),
            text_update(2, "5"),
        ];
        dispatch_batch(&dispatcher, batch).await;

        assert_eq!(store.get(UserId(1)).unwrap().answers, vec![4, 2]);
        assert_eq!(store.get(UserId(2)).unwrap().answers, vec![0, 5]);
    }
}
