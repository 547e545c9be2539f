//! Posts gamification notifications to a Discord channel.

use super::{BotNotifier, Notification};
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::{num::NonZeroU64, sync::Arc};

/// Sends notifications as plain messages to one channel through the Discord REST API.
pub struct DiscordNotifier {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl DiscordNotifier {
    /// Creates a notifier for `channel_id` using the bot token.
    #[must_use]
    pub fn new(token: &str, channel_id: NonZeroU64) -> Self {
        Self {
            http: Arc::new(serenity::Http::new(token)),
            channel_id: serenity::ChannelId::from(channel_id),
        }
    }
}

#[async_trait]
impl BotNotifier for DiscordNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.channel_id
            .say(&self.http, notification.message())
            .await?;
        Ok(())
    }
}
