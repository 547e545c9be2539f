use super::score;
use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiQuery, CurrentUser},
        response::ActionResponse,
    },
    core::{
        tracker::Activity,
        transaction::{self, NewTransaction},
    },
    entities,
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// Query string of `GET /api/transactions`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size, capped at 200
    pub limit: Option<u64>,
}

/// POST /api/transactions - expenses, income and transfers all feed the quest tracker.
pub async fn create_transaction(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(body): ApiJson<NewTransaction>,
) -> Result<(StatusCode, Json<ActionResponse<entities::TransactionModel>>)> {
    let recorded = transaction::create_transaction(&state.db, &user_id, body).await?;
    let gamification = score(&state, &user_id, recorded.activity()).await;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            data: recorded.transaction,
            gamification,
        }),
    ))
}

/// GET /api/transactions - newest first, counts towards the review quest.
pub async fn list_transactions(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ActionResponse<Vec<entities::TransactionModel>>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let transactions = transaction::list_transactions(&state.db, &user_id, limit).await?;
    let gamification = score(&state, &user_id, Activity::TransactionsViewed).await;

    Ok(Json(ActionResponse {
        data: transactions,
        gamification,
    }))
}
