//! Quest catalog - the static daily quest templates.
//!
//! The catalog is built from defaults and optional `[[quests]]` overrides in
//! `config.toml`. It is validated once at startup and trusted afterwards.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Kinds of daily quests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// Record at least one expense
    RecordExpense,
    /// Record at least one income
    RecordIncome,
    /// Open the transaction list
    ReviewTransactions,
    /// Look at an account balance
    CheckBalance,
    /// Send a message to the assistant
    AskLucy,
    /// Move money into a savings account
    SaveMoney,
}

impl QuestType {
    /// Every quest type in catalog order.
    pub const ALL: [Self; 6] = [
        Self::RecordExpense,
        Self::RecordIncome,
        Self::ReviewTransactions,
        Self::CheckBalance,
        Self::AskLucy,
        Self::SaveMoney,
    ];

    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecordExpense => "record_expense",
            Self::RecordIncome => "record_income",
            Self::ReviewTransactions => "review_transactions",
            Self::CheckBalance => "check_balance",
            Self::AskLucy => "ask_lucy",
            Self::SaveMoney => "save_money",
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| Error::InvalidInput {
                message: format!("Unknown quest type '{s}'"),
            })
    }
}

/// Lifecycle of a daily quest instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Not yet completed today
    Pending,
    /// Completed; further actions are no-ops
    Completed,
}

impl QuestStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for QuestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(Error::InvalidInput {
                message: format!("Unknown quest status '{other}'"),
            }),
        }
    }
}

/// A quest template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDefinition {
    /// Which quest this template describes
    pub quest_type: QuestType,
    /// Short title shown to the user
    pub title: String,
    /// Longer explanation
    pub description: String,
    /// XP granted on completion
    pub xp_reward: i64,
    /// Qualifying actions needed to reach 100%
    pub target: i32,
}

impl QuestDefinition {
    fn new(quest_type: QuestType, title: &str, description: &str, xp_reward: i64, target: i32) -> Self {
        Self {
            quest_type,
            title: title.to_string(),
            description: description.to_string(),
            xp_reward,
            target,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.xp_reward < 0 {
            return Err(Error::Config {
                message: format!(
                    "Quest '{}' has a negative xp_reward ({})",
                    self.quest_type, self.xp_reward
                ),
            });
        }
        if self.target < 1 {
            return Err(Error::Config {
                message: format!(
                    "Quest '{}' needs a target of at least 1, got {}",
                    self.quest_type, self.target
                ),
            });
        }
        if self.title.trim().is_empty() {
            return Err(Error::Config {
                message: format!("Quest '{}' has an empty title", self.quest_type),
            });
        }
        Ok(())
    }
}

/// Progress percentage for `count` qualifying actions out of `target`.
#[must_use]
pub fn progress_for(count: i32, target: i32) -> i32 {
    if target <= 0 {
        return 100;
    }
    let pct = i64::from(count.max(0)) * 100 / i64::from(target);
    i32::try_from(pct.min(100)).unwrap_or(100)
}

/// The validated set of quest templates, one per [`QuestType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestCatalog {
    definitions: Vec<QuestDefinition>,
}

impl Default for QuestCatalog {
    fn default() -> Self {
        Self {
            definitions: vec![
                QuestDefinition::new(
                    QuestType::RecordExpense,
                    "Track a purchase",
                    "Record at least one expense today.",
                    20,
                    1,
                ),
                QuestDefinition::new(
                    QuestType::RecordIncome,
                    "Log your income",
                    "Record at least one income today.",
                    20,
                    1,
                ),
                QuestDefinition::new(
                    QuestType::ReviewTransactions,
                    "Review your spending",
                    "Look through your transaction history three times today.",
                    10,
                    3,
                ),
                QuestDefinition::new(
                    QuestType::CheckBalance,
                    "Check your balance",
                    "Open one of your accounts to see its balance.",
                    10,
                    1,
                ),
                QuestDefinition::new(
                    QuestType::AskLucy,
                    "Say hi to Lucy",
                    "Send a message to your finance assistant.",
                    15,
                    1,
                ),
                QuestDefinition::new(
                    QuestType::SaveMoney,
                    "Pay yourself first",
                    "Transfer money into a savings account.",
                    30,
                    1,
                ),
            ],
        }
    }
}

impl QuestCatalog {
    /// Builds the catalog from the defaults, replacing templates named in `overrides`.
    ///
    /// # Errors
    /// Returns `Error::Config` when an override repeats a quest type or fails validation.
    pub fn with_overrides(overrides: Vec<QuestDefinition>) -> Result<Self> {
        let mut catalog = Self::default();
        let mut seen = Vec::with_capacity(overrides.len());

        for definition in overrides {
            if seen.contains(&definition.quest_type) {
                return Err(Error::Config {
                    message: format!("Quest '{}' is configured twice", definition.quest_type),
                });
            }
            seen.push(definition.quest_type);
            definition.validate()?;

            if let Some(slot) = catalog
                .definitions
                .iter_mut()
                .find(|d| d.quest_type == definition.quest_type)
            {
                *slot = definition;
            }
        }

        Ok(catalog)
    }

    /// All templates in catalog order.
    #[must_use]
    pub fn definitions(&self) -> &[QuestDefinition] {
        &self.definitions
    }

    /// Template for a single quest type.
    #[must_use]
    pub fn get(&self, quest_type: QuestType) -> Option<&QuestDefinition> {
        self.definitions.iter().find(|d| d.quest_type == quest_type)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_catalog_covers_every_type() {
        let catalog = QuestCatalog::default();
        assert_eq!(catalog.definitions().len(), QuestType::ALL.len());
        for quest_type in QuestType::ALL {
            let definition = catalog.get(quest_type).unwrap();
            assert!(definition.validate().is_ok());
        }
    }

    #[test]
    fn test_quest_type_string_round_trip() {
        for quest_type in QuestType::ALL {
            assert_eq!(quest_type.as_str().parse::<QuestType>().unwrap(), quest_type);
        }
        assert!("pay_taxes".parse::<QuestType>().is_err());
    }

    #[test]
    fn test_override_replaces_template() {
        let catalog = QuestCatalog::with_overrides(vec![QuestDefinition::new(
            QuestType::ReviewTransactions,
            "Audit",
            "Look five times.",
            40,
            5,
        )])
        .unwrap();

        let review = catalog.get(QuestType::ReviewTransactions).unwrap();
        assert_eq!(review.title, "Audit");
        assert_eq!(review.target, 5);
        assert_eq!(review.xp_reward, 40);
        assert_eq!(catalog.definitions().len(), 6);
    }

    #[test]
    fn test_negative_reward_rejected() {
        let result = QuestCatalog::with_overrides(vec![QuestDefinition::new(
            QuestType::AskLucy,
            "Chat",
            "",
            -5,
            1,
        )]);
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_zero_target_rejected() {
        let result = QuestCatalog::with_overrides(vec![QuestDefinition::new(
            QuestType::AskLucy,
            "Chat",
            "",
            5,
            0,
        )]);
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_duplicate_override_rejected() {
        let definition = QuestDefinition::new(QuestType::SaveMoney, "Save", "", 5, 1);
        let result = QuestCatalog::with_overrides(vec![definition.clone(), definition]);
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_progress_for() {
        assert_eq!(progress_for(0, 3), 0);
        assert_eq!(progress_for(1, 3), 33);
        assert_eq!(progress_for(2, 3), 66);
        assert_eq!(progress_for(3, 3), 100);
        assert_eq!(progress_for(7, 3), 100);
        assert_eq!(progress_for(1, 1), 100);
    }
}
