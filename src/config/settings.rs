//! Application settings loaded from config.toml
//!
//! Every section has defaults, so a missing file or a partial file is fine. Values are
//! validated here, before anything reaches the gamification engine.

use crate::{
    core::{
        heart::HeartConfig,
        level::LevelCurve,
        quests::{QuestCatalog, QuestDefinition},
        rules::{DEFAULT_MAX_UPDATE_ATTEMPTS, GamificationRules},
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base XP for every recorded transaction
    pub entry_xp: i64,
    /// Retry budget for profile and quest writes that hit a write conflict
    pub max_update_attempts: u32,
    /// XP curve
    pub level_curve: LevelCurve,
    /// Heart meter tuning
    pub heart: HeartConfig,
    /// Bot notification queue
    pub notifications: NotificationSettings,
    /// Quest template overrides
    pub quests: Vec<QuestDefinition>,
}

impl Default for Settings {
    fn default() -> Self {
        let rules = GamificationRules::default();
        Self {
            entry_xp: rules.entry_xp,
            max_update_attempts: DEFAULT_MAX_UPDATE_ATTEMPTS,
            level_curve: rules.level_curve,
            heart: rules.heart,
            notifications: NotificationSettings::default(),
            quests: Vec::new(),
        }
    }
}

/// Settings for the bot-channel notification worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    /// Queued notifications before new ones are dropped
    pub queue_capacity: usize,
    /// Delivery attempts per notification
    pub max_attempts: u32,
    /// Pause between attempts, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            max_attempts: 3,
            retry_backoff_ms: 500,
        }
    }
}

impl NotificationSettings {
    /// Pause between delivery attempts.
    #[must_use]
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Settings {
    /// Builds the validated gamification rules.
    ///
    /// # Errors
    /// Returns `Error::Config` for a bad curve, negative rewards or zero targets.
    pub fn rules(&self) -> Result<GamificationRules> {
        let rules = GamificationRules {
            entry_xp: self.entry_xp,
            level_curve: self.level_curve,
            heart: self.heart,
            catalog: QuestCatalog::with_overrides(self.quests.clone())?,
            max_update_attempts: self.max_update_attempts,
        };
        rules.validate()?;
        Ok(rules)
    }

    fn validate(&self) -> Result<()> {
        if self.notifications.queue_capacity == 0 {
            return Err(Error::Config {
                message: "notifications.queue_capacity must be at least 1".to_string(),
            });
        }
        if self.notifications.max_attempts == 0 {
            return Err(Error::Config {
                message: "notifications.max_attempts must be at least 1".to_string(),
            });
        }
        self.rules().map(|_| ())
    }
}

/// Parses and validates settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from a TOML file; a missing file yields the defaults.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid
/// - A value fails validation
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!(?path, "No config file found, using default settings");
        return Ok(Settings::default());
    }

    debug!(?path, "Loading settings");
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `CONFIG_PATH`, or ./config.toml
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}
