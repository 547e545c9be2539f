//! Quest progress tracking - turns user activity into quest progress, XP and events.
//!
//! Each qualifying activity maps to at most one daily quest. Scoring runs in one database
//! transaction whose first statement is the insert-or-ignore of the day's quests, so the
//! write lock is held before the quest is read. The quest row is then advanced with a
//! guard on `(status, count)`; only the caller that flips the quest to `completed` credits
//! its reward, so replays and concurrent requests can never pay out twice. A write conflict
//! rolls the whole activity back and scores it again.

use crate::{
    core::{
        level::LevelUp,
        profile::{ProfileDelta, ProfileSummary, ProfileUpdate, write_profile},
        quests::{QuestStatus, QuestType, progress_for},
        rules::GamificationRules,
        streak::StreakChange,
        transaction::TransactionKind,
    },
    entities::{DailyQuest, daily_quest},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::OnConflict,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// A user action the gamification layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// A transaction was stored
    TransactionRecorded {
        /// Direction of the transaction
        kind: TransactionKind,
        /// True for transfers whose destination is a savings account
        into_savings: bool,
    },
    /// The transaction list was opened
    TransactionsViewed,
    /// An account balance was opened
    BalanceViewed,
    /// A message was sent to the assistant
    AssistantMessage,
}

impl Activity {
    /// The daily quest this activity counts towards, if any.
    #[must_use]
    pub const fn quest_type(&self) -> Option<QuestType> {
        match self {
            Self::TransactionRecorded {
                kind: TransactionKind::Expense,
                ..
            } => Some(QuestType::RecordExpense),
            Self::TransactionRecorded {
                kind: TransactionKind::Income,
                ..
            } => Some(QuestType::RecordIncome),
            Self::TransactionRecorded {
                kind: TransactionKind::Transfer,
                into_savings: true,
            } => Some(QuestType::SaveMoney),
            Self::TransactionRecorded {
                kind: TransactionKind::Transfer,
                into_savings: false,
            } => None,
            Self::TransactionsViewed => Some(QuestType::ReviewTransactions),
            Self::BalanceViewed => Some(QuestType::CheckBalance),
            Self::AssistantMessage => Some(QuestType::AskLucy),
        }
    }

    /// Entries advance the streak and earn base XP.
    #[must_use]
    pub const fn is_entry(&self) -> bool {
        matches!(self, Self::TransactionRecorded { .. })
    }
}

/// Something worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GamificationEvent {
    /// A daily quest was completed
    QuestCompleted {
        /// Which quest
        quest_type: QuestType,
        /// Quest title
        title: String,
        /// XP granted
        xp_reward: i64,
    },
    /// The profile reached a higher level
    LevelUp {
        /// Level before
        from: i32,
        /// Level after
        to: i32,
    },
}

impl From<LevelUp> for GamificationEvent {
    fn from(level_up: LevelUp) -> Self {
        Self::LevelUp {
            from: level_up.from,
            to: level_up.to,
        }
    }
}

/// Public view of a daily quest instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestView {
    /// Quest type
    pub quest_type: QuestType,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Reward on completion
    pub xp_reward: i64,
    /// Completion percentage
    pub progress: i32,
    /// Pending or completed
    pub status: QuestStatus,
    /// Qualifying actions seen today
    pub count: i32,
    /// Qualifying actions needed
    pub target: i32,
}

impl TryFrom<daily_quest::Model> for QuestView {
    type Error = Error;

    fn try_from(model: daily_quest::Model) -> Result<Self> {
        Ok(Self {
            quest_type: model.quest_type.parse()?,
            status: model.status.parse()?,
            title: model.title,
            description: model.description,
            xp_reward: model.xp_reward,
            progress: model.progress,
            count: model.count,
            target: model.target,
        })
    }
}

/// Everything an activity changed, embedded in the response of the triggering request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityOutcome {
    /// XP credited by this activity
    pub xp_gained: i64,
    /// The quest this activity counted towards, after the update
    pub quest: Option<QuestView>,
    /// Streak change for entries
    pub streak: Option<StreakChange>,
    /// Quest completions and level-ups, in that order
    pub events: Vec<GamificationEvent>,
    /// Profile after the update
    pub profile: ProfileSummary,
}

/// Today's date as used for quests and streaks.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Makes sure the user has one quest row per catalog entry for `date`, then returns them.
pub async fn ensure_daily_quests<C>(
    db: &C,
    user_id: &str,
    date: NaiveDate,
    rules: &GamificationRules,
) -> Result<Vec<daily_quest::Model>>
where
    C: ConnectionTrait,
{
    let rows = rules.catalog.definitions().iter().map(|d| daily_quest::ActiveModel {
        user_id: Set(user_id.to_string()),
        quest_date: Set(date),
        quest_type: Set(d.quest_type.as_str().to_string()),
        title: Set(d.title.clone()),
        description: Set(d.description.clone()),
        xp_reward: Set(d.xp_reward),
        target: Set(d.target),
        count: Set(0),
        progress: Set(0),
        status: Set(QuestStatus::Pending.as_str().to_string()),
        completed_at: Set(None),
        ..Default::default()
    });

    DailyQuest::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                daily_quest::Column::UserId,
                daily_quest::Column::QuestDate,
                daily_quest::Column::QuestType,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    DailyQuest::find()
        .filter(daily_quest::Column::UserId.eq(user_id))
        .filter(daily_quest::Column::QuestDate.eq(date))
        .order_by_asc(daily_quest::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The user's quests for `date`, instantiating them on first request.
pub async fn list_daily_quests(
    db: &DatabaseConnection,
    user_id: &str,
    date: NaiveDate,
    rules: &GamificationRules,
) -> Result<Vec<QuestView>> {
    ensure_daily_quests(db, user_id, date, rules)
        .await?
        .into_iter()
        .map(QuestView::try_from)
        .collect()
}

/// Scores one activity: advances the matching quest, credits XP, streak and heart, and
/// reports what happened.
///
/// Write conflicts are retried up to `rules.max_update_attempts` times before
/// `Error::ConcurrentUpdate` is returned.
#[instrument(skip(db, rules))]
pub async fn record_activity(
    db: &DatabaseConnection,
    rules: &GamificationRules,
    user_id: &str,
    activity: Activity,
    date: NaiveDate,
) -> Result<ActivityOutcome> {
    let attempts = rules.max_update_attempts.max(1);
    for attempt in 1..=attempts {
        let result: Result<ActivityOutcome> = async {
            let txn = db.begin().await?;
            let scored = score(&txn, rules, user_id, activity, date).await?;
            txn.commit().await?;
            Ok(scored)
        }
        .await;

        match result {
            Err(e) if e.is_write_conflict() && attempt < attempts => {
                debug!(attempt, "Write conflict while scoring, retrying: {e}");
            }
            Err(e) if e.is_write_conflict() => {
                warn!(user_id, attempts, "Giving up on activity: {e}");
            }
            result => return result,
        }
    }

    Err(Error::ConcurrentUpdate {
        user_id: user_id.to_string(),
        attempts,
    })
}

async fn score(
    txn: &DatabaseTransaction,
    rules: &GamificationRules,
    user_id: &str,
    activity: Activity,
    date: NaiveDate,
) -> Result<ActivityOutcome> {
    let base = ProfileDelta {
        xp: if activity.is_entry() { rules.entry_xp } else { 0 },
        heart: i64::from(rules.heart.per_activity),
        quests_completed: 0,
        entry_date: activity.is_entry().then_some(date),
    };

    let Some(quest_type) = activity.quest_type() else {
        let update = write_profile(txn, user_id, base, rules).await?;
        return Ok(outcome(base.xp, None, None, update));
    };

    let current = ensure_daily_quests(txn, user_id, date, rules)
        .await?
        .into_iter()
        .find(|q| q.quest_type == quest_type.as_str())
        .ok_or_else(|| Error::InvalidInput {
            message: format!("Quest '{quest_type}' is not in the catalog"),
        })?;

    if current.status == QuestStatus::Completed.as_str() {
        debug!(%quest_type, "Quest already completed today");
        let update = write_profile(txn, user_id, base, rules).await?;
        let view = QuestView::try_from(current)?;
        return Ok(outcome(base.xp, Some(view), None, update));
    }

    let count = current.count + 1;
    let completed = count >= current.target;
    let progress = if completed {
        100
    } else {
        progress_for(count, current.target).max(current.progress)
    };
    let status = if completed {
        QuestStatus::Completed
    } else {
        QuestStatus::Pending
    };

    let advanced = DailyQuest::update_many()
        .set(daily_quest::ActiveModel {
            count: Set(count),
            progress: Set(progress),
            status: Set(status.as_str().to_string()),
            completed_at: Set(completed.then(chrono::Utc::now)),
            ..Default::default()
        })
        .filter(daily_quest::Column::Id.eq(current.id))
        .filter(daily_quest::Column::Status.eq(QuestStatus::Pending.as_str()))
        .filter(daily_quest::Column::Count.eq(current.count))
        .exec(txn)
        .await?;

    if advanced.rows_affected == 0 {
        return Err(Error::ConcurrentUpdate {
            user_id: user_id.to_string(),
            attempts: 1,
        });
    }

    let delta = if completed {
        ProfileDelta {
            xp: base.xp + current.xp_reward,
            heart: base.heart + i64::from(rules.heart.per_quest),
            quests_completed: 1,
            ..base
        }
    } else {
        base
    };

    let update = write_profile(txn, user_id, delta, rules).await?;
    let stored = DailyQuest::find_by_id(current.id)
        .one(txn)
        .await?
        .ok_or(Error::QuestNotFound { id: current.id })?;

    let completion = completed.then(|| GamificationEvent::QuestCompleted {
        quest_type,
        title: current.title.clone(),
        xp_reward: current.xp_reward,
    });
    if completion.is_some() {
        info!(user_id, %quest_type, xp_reward = current.xp_reward, "Quest completed");
    }

    Ok(outcome(
        delta.xp,
        Some(QuestView::try_from(stored)?),
        completion,
        update,
    ))
}

fn outcome(
    xp_gained: i64,
    quest: Option<QuestView>,
    completion: Option<GamificationEvent>,
    update: ProfileUpdate,
) -> ActivityOutcome {
    let mut events: Vec<GamificationEvent> = completion.into_iter().collect();
    if let Some(level_up) = update.level_up {
        info!(user_id = %update.profile.user_id, to = level_up.to, "Level up");
        events.push(level_up.into());
    }

    ActivityOutcome {
        xp_gained,
        quest,
        streak: update.streak,
        events,
        profile: update.profile.into(),
    }
}
