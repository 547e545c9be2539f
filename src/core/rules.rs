//! Gamification rules - the validated runtime view of config.toml.

use crate::{
    core::{heart::HeartConfig, level::LevelCurve, quests::QuestCatalog},
    errors::{Error, Result},
};

/// Attempts made for a conflicting profile or quest write before giving up
pub const DEFAULT_MAX_UPDATE_ATTEMPTS: u32 = 8;

/// Everything the tracker needs to score an activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamificationRules {
    /// Base XP granted for every recorded transaction
    pub entry_xp: i64,
    /// Level curve
    pub level_curve: LevelCurve,
    /// Heart meter tuning
    pub heart: HeartConfig,
    /// Daily quest templates
    pub catalog: QuestCatalog,
    /// Retry budget for profile and quest writes that hit a write conflict
    pub max_update_attempts: u32,
}

impl Default for GamificationRules {
    fn default() -> Self {
        Self {
            entry_xp: 5,
            level_curve: LevelCurve::default(),
            heart: HeartConfig::default(),
            catalog: QuestCatalog::default(),
            max_update_attempts: DEFAULT_MAX_UPDATE_ATTEMPTS,
        }
    }
}

impl GamificationRules {
    /// Checks the parts that are not validated on construction.
    pub fn validate(&self) -> Result<()> {
        self.level_curve.validate()?;
        if self.entry_xp < 0 {
            return Err(Error::Config {
                message: format!("entry_xp must not be negative, got {}", self.entry_xp),
            });
        }
        if self.max_update_attempts == 0 {
            return Err(Error::Config {
                message: "max_update_attempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
