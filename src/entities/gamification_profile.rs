//! Gamification profile entity - One row per user holding level, XP, streak and heart meter.
//!
//! `version` is bumped on every write and used as the optimistic concurrency guard.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gamification profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gamification_profiles")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the profile
    #[sea_orm(unique)]
    pub user_id: String,
    /// Current level, starts at 1
    pub level: i32,
    /// Progress inside the current level
    pub xp: i64,
    /// XP still missing for the next level
    pub xp_to_next_level: i64,
    /// Consecutive days with at least one recorded entry
    pub streak_days: i32,
    /// Affection meter, always within 0..=100
    pub heart_level: i32,
    /// Lifetime XP
    pub total_xp_earned: i64,
    /// Lifetime completed daily quests
    pub total_quests_completed: i64,
    /// Day of the most recent entry
    pub last_entry_date: Option<Date>,
    /// Optimistic concurrency counter
    pub version: i64,
    /// When the profile was created
    pub created_at: DateTimeUtc,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

/// Profiles are linked to quests by `user_id` only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
