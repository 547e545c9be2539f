//! Unified error type for `PennyQuest`.
//!
//! Every fallible operation in the crate returns [`Result`]. HTTP status mapping
//! lives in `api::error`, the bot reports errors through poise's `on_error`.

use sea_orm::{DbErr, RuntimeErr};
use thiserror::Error;

/// All errors produced by the finance and gamification layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Error reported by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A monetary amount that is zero, negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Malformed request data rejected before it reaches the business logic
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Human-readable description
        message: String,
    },

    /// The request did not identify a user
    #[error("Missing user identity")]
    MissingUser,

    /// Account lookup failed or the account belongs to another user
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// Requested account id
        id: i64,
    },

    /// Spending would push an account below zero
    #[error("Insufficient funds: balance {current:.2}, required {required:.2}")]
    InsufficientFunds {
        /// Current account balance
        current: f64,
        /// Amount the operation needs
        required: f64,
    },

    /// A profile row was missing right after it was created or updated
    #[error("Gamification profile for user {user_id} not found")]
    ProfileNotFound {
        /// User whose profile is missing
        user_id: String,
    },

    /// A daily quest row was missing while it was being advanced
    #[error("Daily quest {id} not found")]
    QuestNotFound {
        /// Quest row id
        id: i64,
    },

    /// A guarded profile or quest write kept losing to concurrent writers
    #[error("Concurrent update conflict for user {user_id} after {attempts} attempts")]
    ConcurrentUpdate {
        /// User whose profile could not be updated
        user_id: String,
        /// Number of attempts made
        attempts: u32,
    },

    /// Bot-channel delivery failed
    #[error("Notification delivery failed: {message}")]
    Notification {
        /// Human-readable description
        message: String,
    },

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// True when running the same write again can succeed: a lost version guard, or
    /// `SQLite` reporting the database as busy or locked.
    #[must_use]
    pub fn is_write_conflict(&self) -> bool {
        match self {
            Self::ConcurrentUpdate { .. } => true,
            Self::Database(
                DbErr::Exec(RuntimeErr::SqlxError(e))
                | DbErr::Query(RuntimeErr::SqlxError(e))
                | DbErr::Conn(RuntimeErr::SqlxError(e)),
            ) => is_sqlite_busy(e),
            _ => false,
        }
    }
}

// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including their extended codes.
fn is_sqlite_busy(err: &sea_orm::sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .and_then(|code| code.parse::<i32>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
