//! Quest and profile commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            heart::HEART_MAX,
            profile::get_or_create_profile,
            quests::QuestStatus,
            tracker::{self, QuestView},
        },
        errors::{Error, Result},
    };

    fn quest_line(quest: &QuestView) -> String {
        let mark = if quest.status == QuestStatus::Completed {
            "✅"
        } else {
            "⬜"
        };
        format!(
            "{mark} **{}** - {} ({}/{}, +{} XP)",
            quest.title,
            quest.description,
            quest.count.min(quest.target),
            quest.target,
            quest.xp_reward
        )
    }

    /// Shows today's quests.
    #[poise::command(slash_command, prefix_command)]
    pub async fn quests(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let quests =
            tracker::list_daily_quests(&data.database, &user_id, tracker::today(), &data.rules)
                .await?;

        let lines: Vec<String> = quests.iter().map(quest_line).collect();
        ctx.say(format!("**Today's quests**\n{}", lines.join("\n")))
            .await?;
        Ok(())
    }

    /// Shows your level, XP, streak and heart meter.
    #[poise::command(slash_command, prefix_command)]
    pub async fn profile(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        let profile = get_or_create_profile(&data.database, &user_id, &data.rules).await?;

        ctx.say(format!(
            "**Level {}** - {} XP, {} to the next level\n\
            🔥 Streak: {} day(s)\n\
            ❤️ Heart: {}/{HEART_MAX}\n\
            🏆 Quests completed: {} (lifetime XP {})",
            profile.level,
            profile.xp,
            profile.xp_to_next_level,
            profile.streak_days,
            profile.heart_level,
            profile.total_quests_completed,
            profile.total_xp_earned,
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
