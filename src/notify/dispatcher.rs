//! Bounded notification queue with a retrying delivery worker.

use super::{BotNotifier, Notification};
use crate::{config::settings::NotificationSettings, core::tracker::GamificationEvent};
use std::sync::Arc;
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::JoinHandle,
};
use tracing::{debug, error, warn};

/// Handle used by request handlers to enqueue notifications. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<Notification>,
}

impl NotificationDispatcher {
    /// Spawns the delivery worker and returns the dispatcher feeding it.
    ///
    /// The worker stops once every dispatcher clone has been dropped and the queue is
    /// drained.
    #[must_use]
    pub fn start(
        notifier: Arc<dyn BotNotifier>,
        settings: NotificationSettings,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, notifier, settings));
        (Self { sender }, worker)
    }

    /// Enqueues one notification per event. Never blocks and never fails: a full or
    /// closed queue drops the notification with a warning.
    pub fn dispatch(&self, user_id: &str, events: &[GamificationEvent]) {
        for event in events {
            let notification = Notification {
                user_id: user_id.to_string(),
                event: event.clone(),
            };
            match self.sender.try_send(notification) {
                Ok(()) => {}
                Err(TrySendError::Full(dropped)) => {
                    warn!(user_id = %dropped.user_id, "Notification queue full, dropping event");
                }
                Err(TrySendError::Closed(dropped)) => {
                    warn!(user_id = %dropped.user_id, "Notification worker stopped, dropping event");
                }
            }
        }
    }
}

/// Drains the queue, delivering each notification with up to `max_attempts` tries.
pub async fn run_worker(
    mut receiver: mpsc::Receiver<Notification>,
    notifier: Arc<dyn BotNotifier>,
    settings: NotificationSettings,
) {
    while let Some(notification) = receiver.recv().await {
        deliver_with_retry(notifier.as_ref(), &notification, settings).await;
    }
    debug!("Notification queue closed, worker exiting");
}

async fn deliver_with_retry(
    notifier: &dyn BotNotifier,
    notification: &Notification,
    settings: NotificationSettings,
) {
    let attempts = settings.max_attempts.max(1);
    for attempt in 1..=attempts {
        match notifier.deliver(notification).await {
            Ok(()) => return,
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, "Notification delivery failed, retrying");
                tokio::time::sleep(settings.retry_backoff()).await;
            }
            Err(e) => {
                error!(
                    user_id = %notification.user_id,
                    error = %e,
                    "Giving up on notification"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        failures_left: Mutex<u32>,
        attempts: Mutex<u32>,
        delivered: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: Mutex::new(times),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl BotNotifier for RecordingNotifier {
        async fn deliver(&self, notification: &Notification) -> Result<()> {
            *self.attempts.lock().unwrap() += 1;
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::Notification {
                    message: "channel unavailable".to_string(),
                });
            }
            self.delivered.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn settings(max_attempts: u32) -> NotificationSettings {
        NotificationSettings {
            queue_capacity: 16,
            max_attempts,
            retry_backoff_ms: 0,
        }
    }

    const LEVEL_UP: GamificationEvent = GamificationEvent::LevelUp { from: 1, to: 2 };

    #[tokio::test]
    async fn test_dispatch_delivers_in_background() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (dispatcher, worker) = NotificationDispatcher::start(notifier.clone(), settings(3));

        dispatcher.dispatch("alice", &[LEVEL_UP, LEVEL_UP]);
        drop(dispatcher);
        worker.await.unwrap();

        let delivered = notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(delivered[0].user_id, "alice");
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let notifier = Arc::new(RecordingNotifier::failing(2));
        let (dispatcher, worker) = NotificationDispatcher::start(notifier.clone(), settings(3));

        dispatcher.dispatch("alice", &[LEVEL_UP]);
        drop(dispatcher);
        worker.await.unwrap();

        assert_eq!(*notifier.attempts.lock().unwrap(), 3);
        assert_eq!(notifier.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_persistent_failure_is_swallowed() {
        let notifier = Arc::new(RecordingNotifier::failing(5));
        let (dispatcher, worker) = NotificationDispatcher::start(notifier.clone(), settings(2));

        dispatcher.dispatch("alice", &[LEVEL_UP, LEVEL_UP]);
        drop(dispatcher);
        worker.await.unwrap();

        // First notification burns two attempts, second burns two more and then one
        // failure remains, so nothing is delivered and the worker still exits cleanly.
        assert_eq!(*notifier.attempts.lock().unwrap(), 4);
        assert!(notifier.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let (sender, mut receiver) = mpsc::channel(1);
        let dispatcher = NotificationDispatcher { sender };

        dispatcher.dispatch("alice", &[LEVEL_UP, LEVEL_UP, LEVEL_UP]);
        drop(dispatcher);

        let mut received = 0;
        while receiver.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 1);
    }

    #[tokio::test]
    async fn test_closed_queue_is_ignored() {
        let (sender, receiver) = mpsc::channel(4);
        drop(receiver);
        let dispatcher = NotificationDispatcher { sender };
        dispatcher.dispatch("alice", &[LEVEL_UP]);
    }
}
