//! Daily quest entity - One instance per user, day and quest type.
//!
//! Rows are created from the quest catalog and never deleted; older days are simply
//! no longer consulted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily quest database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_quests")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the quest
    pub user_id: String,
    /// Calendar day this instance belongs to
    pub quest_date: Date,
    /// Quest type key (e.g., `"record_expense"`)
    pub quest_type: String,
    /// Title copied from the catalog
    pub title: String,
    /// Description copied from the catalog
    pub description: String,
    /// XP granted on completion
    pub xp_reward: i64,
    /// Qualifying actions needed for completion
    pub target: i32,
    /// Qualifying actions seen so far
    pub count: i32,
    /// Completion percentage, 0..=100
    pub progress: i32,
    /// `"pending"` or `"completed"`
    pub status: String,
    /// When the quest flipped to completed
    pub completed_at: Option<DateTimeUtc>,
}

/// Quests are linked to profiles by `user_id` only
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
