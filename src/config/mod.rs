/// Database configuration and connection management
pub mod database;

/// Server and bot settings from environment variables
pub mod server;

/// Gamification and notification settings from config.toml
pub mod settings;
