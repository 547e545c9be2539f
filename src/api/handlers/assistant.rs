use super::score;
use crate::{
    api::{
        AppState,
        extract::{ApiJson, CurrentUser},
        response::ActionResponse,
    },
    core::tracker::Activity,
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Fixed acknowledgement; there is no language model behind the assistant.
pub const ASSISTANT_REPLY: &str =
    "Thanks for checking in! Keep logging your spending and I'll keep cheering you on.";

/// Body of `POST /api/assistant/messages`.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    /// What the user wrote
    pub message: String,
}

/// The assistant's answer.
#[derive(Debug, Serialize)]
pub struct AssistantReply {
    /// Reply text
    pub reply: &'static str,
}

/// POST /api/assistant/messages - counts towards the ask-Lucy quest.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(body): ApiJson<AssistantMessage>,
) -> Result<Json<ActionResponse<AssistantReply>>> {
    if body.message.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Message cannot be empty".to_string(),
        });
    }

    let gamification = score(&state, &user_id, Activity::AssistantMessage).await;

    Ok(Json(ActionResponse {
        data: AssistantReply {
            reply: ASSISTANT_REPLY,
        },
        gamification,
    }))
}
