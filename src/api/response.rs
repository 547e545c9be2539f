use crate::core::tracker::ActivityOutcome;
use serde::Serialize;

/// Standard `{ "data": T }` envelope for reads.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    /// Payload
    pub data: T,
}

/// Envelope for actions that feed the gamification layer.
///
/// `gamification` is `null` when scoring failed; the action itself still succeeded.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T: Serialize> {
    /// Payload
    pub data: T,
    /// What the action earned
    pub gamification: Option<ActivityOutcome>,
}
