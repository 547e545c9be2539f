//! Gamification profile - lazy creation and atomic XP/streak/heart updates.
//!
//! Every write runs in a database transaction that starts with a write statement (the
//! insert-or-ignore that creates missing profiles), so the transaction owns the write lock
//! before it reads the row. The new state is computed with [`apply_delta`] and stored with
//! `UPDATE ... WHERE user_id = ? AND version = ?`. Concurrent credits queue on the lock
//! instead of racing, and none of them is lost.

use crate::{
    core::{
        heart,
        level::LevelUp,
        rules::GamificationRules,
        streak::{StreakChange, advance_streak},
    },
    entities::{GamificationProfile, gamification_profile},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::OnConflict};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Changes produced by one activity, applied to the profile in a single write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileDelta {
    /// XP to credit (never negative)
    pub xp: i64,
    /// Heart meter change before clamping
    pub heart: i64,
    /// Quests completed by this activity
    pub quests_completed: i64,
    /// Day of a recorded entry, advances the streak
    pub entry_date: Option<NaiveDate>,
}

/// New profile values computed by [`apply_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDelta {
    /// Level after the credit
    pub level: i32,
    /// Within-level XP after the credit
    pub xp: i64,
    /// XP missing for the next level
    pub xp_to_next_level: i64,
    /// Streak after the entry
    pub streak_days: i32,
    /// Clamped heart level
    pub heart_level: i32,
    /// Lifetime XP
    pub total_xp_earned: i64,
    /// Lifetime quests
    pub total_quests_completed: i64,
    /// Last entry day
    pub last_entry_date: Option<NaiveDate>,
    /// Set when the level went up
    pub level_up: Option<LevelUp>,
    /// Set when the delta carried an entry date
    pub streak: Option<StreakChange>,
}

/// Result of [`apply_to_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// The stored profile after the write
    pub profile: gamification_profile::Model,
    /// Set when the level went up
    pub level_up: Option<LevelUp>,
    /// Set when the delta carried an entry date
    pub streak: Option<StreakChange>,
}

/// Public view of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    /// Owner
    pub user_id: String,
    /// Current level
    pub level: i32,
    /// Within-level XP
    pub xp: i64,
    /// XP missing for the next level
    pub xp_to_next_level: i64,
    /// Consecutive entry days
    pub streak_days: i32,
    /// Heart meter, 0..=100
    pub heart_level: i32,
    /// Lifetime XP
    pub total_xp_earned: i64,
    /// Lifetime completed quests
    pub total_quests_completed: i64,
    /// Day of the most recent entry
    pub last_entry_date: Option<NaiveDate>,
}

impl From<gamification_profile::Model> for ProfileSummary {
    fn from(model: gamification_profile::Model) -> Self {
        Self {
            user_id: model.user_id,
            level: model.level,
            xp: model.xp,
            xp_to_next_level: model.xp_to_next_level,
            streak_days: model.streak_days,
            heart_level: model.heart_level,
            total_xp_earned: model.total_xp_earned,
            total_quests_completed: model.total_quests_completed,
            last_entry_date: model.last_entry_date,
        }
    }
}

/// Pure profile transition: current row + delta to the new values.
#[must_use]
pub fn apply_delta(
    current: &gamification_profile::Model,
    delta: &ProfileDelta,
    rules: &GamificationRules,
) -> AppliedDelta {
    let curve = &rules.level_curve;
    let gained = delta.xp.max(0);
    let (level, xp) = curve.apply_xp(current.level, current.xp, gained);
    let level_up = (level > current.level).then_some(LevelUp {
        from: current.level,
        to: level,
    });

    let mut heart_delta = delta.heart;
    let (streak_days, last_entry_date, streak) = match delta.entry_date {
        Some(date) => {
            let update = advance_streak(current.last_entry_date, current.streak_days, date);
            if let StreakChange::Reset { missed_days } = update.change {
                heart_delta -= i64::from(rules.heart.decay_per_missed_day) * missed_days;
            }
            (update.streak_days, update.last_entry_date, Some(update.change))
        }
        None => (current.streak_days, current.last_entry_date, None),
    };

    AppliedDelta {
        level,
        xp,
        xp_to_next_level: curve.xp_to_next_level(level, xp),
        streak_days,
        heart_level: heart::adjust(current.heart_level, heart_delta),
        total_xp_earned: current.total_xp_earned + gained,
        total_quests_completed: current.total_quests_completed + delta.quests_completed.max(0),
        last_entry_date,
        level_up,
        streak,
    }
}

/// Looks up a profile without creating it.
pub async fn find_profile<C>(db: &C, user_id: &str) -> Result<Option<gamification_profile::Model>>
where
    C: ConnectionTrait,
{
    GamificationProfile::find()
        .filter(gamification_profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

async fn insert_if_missing<C>(db: &C, user_id: &str, rules: &GamificationRules) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let fresh = gamification_profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        level: Set(1),
        xp: Set(0),
        xp_to_next_level: Set(rules.level_curve.xp_to_next_level(1, 0)),
        streak_days: Set(0),
        heart_level: Set(heart::HEART_MIN),
        total_xp_earned: Set(0),
        total_quests_completed: Set(0),
        last_entry_date: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    GamificationProfile::insert(fresh)
        .on_conflict(
            OnConflict::column(gamification_profile::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

async fn load_profile<C>(db: &C, user_id: &str) -> Result<gamification_profile::Model>
where
    C: ConnectionTrait,
{
    find_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })
}

/// Returns the user's profile, creating a fresh level-1 profile on first use.
///
/// Creation is an insert-or-ignore on the unique `user_id`, so two racing callers end up
/// reading the same row.
pub async fn get_or_create_profile<C>(
    db: &C,
    user_id: &str,
    rules: &GamificationRules,
) -> Result<gamification_profile::Model>
where
    C: ConnectionTrait,
{
    if let Some(profile) = find_profile(db, user_id).await? {
        return Ok(profile);
    }

    insert_if_missing(db, user_id, rules).await?;
    debug!(user_id, "Gamification profile created");
    load_profile(db, user_id).await
}

/// Applies `delta` to the user's profile as one atomic read-modify-write.
///
/// Each attempt is its own database transaction around [`write_profile`]. Concurrent callers
/// are serialized by the write lock; a write conflict (lost version guard, busy database)
/// rolls the attempt back and runs it again, up to `rules.max_update_attempts` times.
#[instrument(skip(db, rules))]
pub async fn apply_to_profile<C>(
    db: &C,
    user_id: &str,
    delta: ProfileDelta,
    rules: &GamificationRules,
) -> Result<ProfileUpdate>
where
    C: TransactionTrait,
{
    let attempts = rules.max_update_attempts.max(1);
    for attempt in 1..=attempts {
        let result: Result<ProfileUpdate> = async {
            let txn = db.begin().await?;
            let update = write_profile(&txn, user_id, delta, rules).await?;
            txn.commit().await?;
            Ok(update)
        }
        .await;

        match result {
            Err(e) if e.is_write_conflict() && attempt < attempts => {
                debug!(attempt, user_id, "Profile write conflict, retrying: {e}");
            }
            Err(e) if e.is_write_conflict() => {
                warn!(user_id, attempts, "Giving up on profile update: {e}");
            }
            result => return result,
        }
    }

    Err(Error::ConcurrentUpdate {
        user_id: user_id.to_string(),
        attempts,
    })
}

/// Applies `delta` inside the caller's transaction.
///
/// The first statement is the insert-or-ignore that creates a missing profile. That write
/// takes the database write lock before the row is read, so no other writer can change the
/// row between the read and the `version`-guarded update.
pub(crate) async fn write_profile<C>(
    db: &C,
    user_id: &str,
    delta: ProfileDelta,
    rules: &GamificationRules,
) -> Result<ProfileUpdate>
where
    C: ConnectionTrait,
{
    insert_if_missing(db, user_id, rules).await?;
    let current = load_profile(db, user_id).await?;
    let applied = apply_delta(&current, &delta, rules);

    let changes = gamification_profile::ActiveModel {
        level: Set(applied.level),
        xp: Set(applied.xp),
        xp_to_next_level: Set(applied.xp_to_next_level),
        streak_days: Set(applied.streak_days),
        heart_level: Set(applied.heart_level),
        total_xp_earned: Set(applied.total_xp_earned),
        total_quests_completed: Set(applied.total_quests_completed),
        last_entry_date: Set(applied.last_entry_date),
        version: Set(current.version + 1),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = GamificationProfile::update_many()
        .set(changes)
        .filter(gamification_profile::Column::UserId.eq(user_id))
        .filter(gamification_profile::Column::Version.eq(current.version))
        .exec(db)
        .await?;

    if result.rows_affected != 1 {
        return Err(Error::ConcurrentUpdate {
            user_id: user_id.to_string(),
            attempts: 1,
        });
    }

    Ok(ProfileUpdate {
        profile: load_profile(db, user_id).await?,
        level_up: applied.level_up,
        streak: applied.streak,
    })
}
