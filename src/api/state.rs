use crate::{core::rules::GamificationRules, notify::NotificationDispatcher};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the connection pool and dispatcher are handles, the rules sit behind
/// an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Validated gamification rules
    pub rules: Arc<GamificationRules>,
    /// Bot-channel notification queue
    pub dispatcher: NotificationDispatcher,
}

impl AppState {
    /// Bundles the shared handles.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        rules: Arc<GamificationRules>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            db,
            rules,
            dispatcher,
        }
    }
}
