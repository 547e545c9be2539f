//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**PennyQuest Help**\n\
        Track your money, complete daily quests and level up.\n\n\
        **Money**\n\
        • `/spend <account> <amount> [category] [description]` - Records an expense.\n\
        • `/income <account> <amount> [category] [description]` - Records income.\n\
        • `/balance <account>` - Shows an account balance.\n\n\
        **Progress**\n\
        • `/quests` - Today's quests and how far along you are.\n\
        • `/profile` - Level, XP, streak and heart meter.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
