//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Balance, spending and income commands
pub mod finance;

/// General utility commands
pub mod general;

/// Quest and profile commands
pub mod gamification;

use crate::{
    bot::BotData,
    core::{
        streak::StreakChange,
        tracker::{ActivityOutcome, GamificationEvent},
    },
    errors::Error,
};

pub use finance::*;
pub use gamification::*;
pub use general::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        quests(),
        profile(),
        balance(),
        spend(),
        income(),
    ]
}

/// Renders what an action earned as extra reply lines. Empty when scoring failed.
#[must_use]
pub fn describe_outcome(outcome: Option<&ActivityOutcome>) -> String {
    let Some(outcome) = outcome else {
        return String::new();
    };

    let mut lines = Vec::new();
    if outcome.xp_gained > 0 {
        lines.push(format!("✨ +{} XP", outcome.xp_gained));
    }
    for event in &outcome.events {
        lines.push(match event {
            GamificationEvent::QuestCompleted {
                title, xp_reward, ..
            } => format!("🎯 Quest complete: **{title}** (+{xp_reward} XP)"),
            GamificationEvent::LevelUp { to, .. } => format!("🎉 Level up! You are now level {to}"),
        });
    }
    match outcome.streak {
        Some(StreakChange::Started | StreakChange::Extended) => lines.push(format!(
            "🔥 Streak: {} day(s)",
            outcome.profile.streak_days
        )),
        Some(StreakChange::Reset { missed_days }) => lines.push(format!(
            "🔥 Streak restarted after {missed_days} missed day(s)"
        )),
        _ => {}
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("\n{}", lines.join("\n"))
    }
}
