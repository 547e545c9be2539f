/// Accounts and balances
pub mod accounts;
/// Assistant chat acknowledgements
pub mod assistant;
/// Quest and profile reads
pub mod gamification;
/// Liveness check
pub mod health;
/// Transaction recording and history
pub mod transactions;

use super::AppState;
use crate::{
    core::tracker::{Activity, ActivityOutcome},
    notify,
};

/// Scores `activity` for the request's user; see [`notify::record_and_notify`].
async fn score(state: &AppState, user_id: &str, activity: Activity) -> Option<ActivityOutcome> {
    notify::record_and_notify(
        &state.db,
        &state.rules,
        &state.dispatcher,
        user_id,
        activity,
    )
    .await
}
