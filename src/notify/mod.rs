//! Notification delivery for gamification events.
//!
//! Events are always returned synchronously in the response of the request that caused
//! them. This module adds the best-effort side channel: a bounded queue drained by a
//! background worker that pushes each event to a [`BotNotifier`] with bounded retry.
//! Nothing here can fail the triggering request.

/// Bounded queue and retrying delivery worker
pub mod dispatcher;
/// Discord channel notifier
pub mod discord;

use crate::{
    core::{
        rules::GamificationRules,
        tracker::{self, Activity, ActivityOutcome, GamificationEvent},
    },
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

pub use dispatcher::NotificationDispatcher;
pub use discord::DiscordNotifier;

/// One event addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient
    pub user_id: String,
    /// What happened
    pub event: GamificationEvent,
}

impl Notification {
    /// Chat-friendly text for the event. Numeric user ids are rendered as Discord mentions.
    #[must_use]
    pub fn message(&self) -> String {
        let who = if self.user_id.parse::<u64>().is_ok() {
            format!("<@{}>", self.user_id)
        } else {
            self.user_id.clone()
        };

        match &self.event {
            GamificationEvent::QuestCompleted {
                title, xp_reward, ..
            } => format!("🎯 {who} completed **{title}** (+{xp_reward} XP)"),
            GamificationEvent::LevelUp { to, .. } => format!("🎉 {who} reached level {to}!"),
        }
    }
}

/// A side channel that can push a notification to the user.
#[async_trait]
pub trait BotNotifier: Send + Sync {
    /// Delivers one notification.
    async fn deliver(&self, notification: &Notification) -> Result<()>;
}

/// Notifier used when no bot is configured: the event only goes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl BotNotifier for LogNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        info!(user_id = %notification.user_id, "{}", notification.message());
        Ok(())
    }
}

/// Scores an activity for today and queues its events for the bot channel.
///
/// Gamification must never fail the finance action that triggered it, so errors are
/// logged and reported as `None`.
pub async fn record_and_notify(
    db: &DatabaseConnection,
    rules: &GamificationRules,
    dispatcher: &NotificationDispatcher,
    user_id: &str,
    activity: Activity,
) -> Option<ActivityOutcome> {
    match tracker::record_activity(db, rules, user_id, activity, tracker::today()).await {
        Ok(outcome) => {
            dispatcher.dispatch(user_id, &outcome.events);
            Some(outcome)
        }
        Err(e) => {
            warn!(user_id, error = %e, ?activity, "Gamification update failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::settings::NotificationSettings,
        core::{quests::QuestType, transaction::TransactionKind},
        test_utils,
    };
    use std::sync::Arc;

    fn log_dispatcher() -> NotificationDispatcher {
        NotificationDispatcher::start(Arc::new(LogNotifier), NotificationSettings::default()).0
    }

    #[tokio::test]
    async fn test_record_and_notify_returns_outcome() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let rules = GamificationRules::default();

        let outcome =
            record_and_notify(&db, &rules, &log_dispatcher(), "alice", Activity::BalanceViewed)
                .await
                .unwrap();

        assert_eq!(outcome.xp_gained, 10);
        assert_eq!(outcome.events.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_scoring_never_drops_outcomes() -> Result<()> {
        let (db, _dir) = test_utils::setup_file_db().await?;
        let rules = Arc::new(GamificationRules::default());
        let dispatcher = log_dispatcher();
        let income = Activity::TransactionRecorded {
            kind: TransactionKind::Income,
            into_savings: false,
        };

        let mut handles = Vec::new();
        for _ in 0..16 {
            let db = db.clone();
            let rules = Arc::clone(&rules);
            let dispatcher = dispatcher.clone();
            handles.push(tokio::spawn(async move {
                record_and_notify(&db, &rules, &dispatcher, "alice", income).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_some());
        }

        let reward = rules.catalog.get(QuestType::RecordIncome).unwrap().xp_reward;
        let profile = crate::core::profile::find_profile(&db, "alice").await?.unwrap();
        assert_eq!(profile.total_xp_earned, 16 * rules.entry_xp + reward);
        assert_eq!(profile.total_quests_completed, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_and_notify_swallows_failures() -> Result<()> {
        // No tables: every gamification query fails.
        let db = sea_orm::Database::connect("sqlite::memory:").await?;
        let rules = GamificationRules::default();

        let outcome =
            record_and_notify(&db, &rules, &log_dispatcher(), "alice", Activity::BalanceViewed)
                .await;

        assert!(outcome.is_none());
        Ok(())
    }

    #[test]
    fn test_message_mentions_discord_users() {
        let notification = Notification {
            user_id: "123456".to_string(),
            event: GamificationEvent::LevelUp { from: 2, to: 3 },
        };
        assert_eq!(notification.message(), "🎉 <@123456> reached level 3!");
    }

    #[test]
    fn test_message_for_quest() {
        let notification = Notification {
            user_id: "alice".to_string(),
            event: GamificationEvent::QuestCompleted {
                quest_type: QuestType::SaveMoney,
                title: "Pay yourself first".to_string(),
                xp_reward: 30,
            },
        };
        assert_eq!(
            notification.message(),
            "🎯 alice completed **Pay yourself first** (+30 XP)"
        );
    }
}
