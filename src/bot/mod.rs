//! Bot layer - Discord-specific interface and command handlers
//!
//! Slash commands mirror the HTTP actions: recording money and checking balances feed
//! the same quest tracker, and each reply ends with what the action earned.

/// Discord command implementations (general, finance, gamification)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::rules::GamificationRules,
    errors::{Error, Result},
    notify::NotificationDispatcher,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Validated gamification rules
    pub rules: Arc<GamificationRules>,
    /// Bot-channel notification queue
    pub dispatcher: NotificationDispatcher,
}

impl BotData {
    /// Creates a new `BotData` from the handles shared with the HTTP server.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        rules: Arc<GamificationRules>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            database,
            rules,
            dispatcher,
        }
    }
}

/// Text shown to the user for a failed command. Internal errors stay in the log.
#[must_use]
pub fn user_message(error: &Error) -> String {
    match error {
        Error::InvalidAmount { .. }
        | Error::InvalidInput { .. }
        | Error::AccountNotFound { .. }
        | Error::InsufficientFunds { .. } => format!("❌ {error}"),
        _ => "❌ Something went wrong, please try again later.".to_string(),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, "Command failed: {error}");
            if let Err(e) = ctx.say(user_message(&error)).await {
                error!("Failed to send error message: {e}");
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Connects to Discord, registers the slash commands globally and runs until the
/// gateway connection ends.
#[instrument(skip_all)]
pub async fn run_bot(token: &str, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting Discord client");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_errors() {
        let shown = user_message(&Error::InsufficientFunds {
            current: 1.0,
            required: 5.0,
        });
        assert!(shown.contains("Insufficient funds"));

        let hidden = user_message(&Error::Config {
            message: "secret path".to_string(),
        });
        assert!(!hidden.contains("secret"));
    }
}
