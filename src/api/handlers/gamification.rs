use crate::{
    api::{AppState, extract::CurrentUser, response::DataResponse},
    core::{
        profile::{self, ProfileSummary},
        tracker::{self, QuestView},
    },
    errors::Result,
};
use axum::{Json, extract::State};

/// GET /api/gamification/quests - today's quests, created on first access.
pub async fn quests(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DataResponse<Vec<QuestView>>>> {
    let quests =
        tracker::list_daily_quests(&state.db, &user_id, tracker::today(), &state.rules).await?;
    Ok(Json(DataResponse { data: quests }))
}

/// GET /api/gamification/profile - created lazily for new users.
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DataResponse<ProfileSummary>>> {
    let profile = profile::get_or_create_profile(&state.db, &user_id, &state.rules).await?;
    Ok(Json(DataResponse {
        data: profile.into(),
    }))
}
