//! Server and bot settings loaded from environment variables.

use crate::errors::{Error, Result};
use std::num::NonZeroU64;

/// Runtime configuration that comes from the environment rather than config.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`)
    pub host: String,
    /// Bind port (default: `3000`)
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`
    pub cors_origins: Vec<String>,
    /// Discord bot token; enables the bot and Discord notifications
    pub discord_token: Option<String>,
    /// Channel that receives gamification notifications (Discord ids are never 0)
    pub notify_channel_id: Option<NonZeroU64>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `DISCORD_BOT_TOKEN`         | unset                   |
    /// | `DISCORD_NOTIFY_CHANNEL_ID` | unset                   |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|e| Error::Config {
                message: format!("PORT must be a valid u16: {e}"),
            })?,
            None => 3000,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let discord_token = lookup("DISCORD_BOT_TOKEN").filter(|t| !t.trim().is_empty());

        let notify_channel_id = match lookup("DISCORD_NOTIFY_CHANNEL_ID")
            .filter(|c| !c.trim().is_empty())
        {
            Some(raw) => Some(raw.trim().parse::<NonZeroU64>().map_err(|e| Error::Config {
                message: format!("DISCORD_NOTIFY_CHANNEL_ID must be a non-zero numeric id: {e}"),
            })?),
            None => None,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            discord_token,
            notify_channel_id,
        })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173".to_string()]);
        assert!(config.discord_token.is_none());
        assert!(config.notify_channel_id.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("DISCORD_BOT_TOKEN", "token"),
            ("DISCORD_NOTIFY_CHANNEL_ID", "1234"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.discord_token.as_deref(), Some("token"));
        assert_eq!(config.notify_channel_id, NonZeroU64::new(1234));
    }

    #[test]
    fn test_blank_discord_settings_are_unset() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DISCORD_BOT_TOKEN", " "),
            ("DISCORD_NOTIFY_CHANNEL_ID", ""),
        ]))
        .unwrap();
        assert!(config.discord_token.is_none());
        assert!(config.notify_channel_id.is_none());
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[("PORT", "http")]));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_bad_channel_id_rejected() {
        for raw in ["0", " 0 ", "general", "-5"] {
            let result =
                ServerConfig::from_lookup(lookup(&[("DISCORD_NOTIFY_CHANNEL_ID", raw)]));
            assert!(matches!(result, Err(Error::Config { message: _ })), "{raw:?}");
        }
    }
}
