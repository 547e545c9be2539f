//! Streak tracking - consecutive calendar days with at least one entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How an action changed the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "change")]
pub enum StreakChange {
    /// First entry ever
    Started,
    /// Another entry on the same day
    Unchanged,
    /// Entry on the day after the previous one
    Extended,
    /// Entry after one or more missed days
    Reset {
        /// Number of days without an entry
        missed_days: i64,
    },
    /// Action dated before the last entry (clock skew)
    Ignored,
}

/// Result of [`advance_streak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// New value for `last_entry_date`
    pub last_entry_date: Option<NaiveDate>,
    /// New value for `streak_days`
    pub streak_days: i32,
    /// What happened
    pub change: StreakChange,
}

/// Pure streak transition: `(last_entry_date, streak_days, action_date)` to the new state.
#[must_use]
pub fn advance_streak(
    last_entry_date: Option<NaiveDate>,
    streak_days: i32,
    action_date: NaiveDate,
) -> StreakUpdate {
    let Some(last) = last_entry_date else {
        return StreakUpdate {
            last_entry_date: Some(action_date),
            streak_days: 1,
            change: StreakChange::Started,
        };
    };

    let gap = (action_date - last).num_days();
    match gap {
        0 => StreakUpdate {
            last_entry_date,
            streak_days,
            change: StreakChange::Unchanged,
        },
        1 => StreakUpdate {
            last_entry_date: Some(action_date),
            streak_days: streak_days + 1,
            change: StreakChange::Extended,
        },
        g if g > 1 => StreakUpdate {
            last_entry_date: Some(action_date),
            streak_days: 1,
            change: StreakChange::Reset { missed_days: g - 1 },
        },
        _ => StreakUpdate {
            last_entry_date,
            streak_days,
            change: StreakChange::Ignored,
        },
    }
}
