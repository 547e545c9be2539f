use super::score;
use crate::{
    api::{
        AppState,
        extract::{ApiJson, ApiPath, CurrentUser},
        response::{ActionResponse, DataResponse},
    },
    core::{
        account::{self, AccountKind},
        tracker::Activity,
    },
    entities,
    errors::Result,
};
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/accounts`.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name
    pub name: String,
    /// Defaults to checking
    #[serde(default = "default_kind")]
    pub kind: AccountKind,
}

const fn default_kind() -> AccountKind {
    AccountKind::Checking
}

/// Body of `GET /api/accounts/{id}/balance`.
#[derive(Debug, Serialize)]
pub struct BalanceView {
    /// Account id
    pub account_id: i64,
    /// Account name
    pub name: String,
    /// Current balance
    pub balance: f64,
}

/// POST /api/accounts
pub async fn create_account(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiJson(body): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<DataResponse<entities::AccountModel>>)> {
    let created = account::create_account(&state.db, &user_id, body.name, body.kind).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<DataResponse<Vec<entities::AccountModel>>>> {
    let accounts = account::list_accounts(&state.db, &user_id).await?;
    Ok(Json(DataResponse { data: accounts }))
}

/// GET /api/accounts/{id}/balance - counts towards the balance-check quest.
pub async fn get_balance(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ActionResponse<BalanceView>>> {
    let found = account::get_account_for_user(&state.db, &user_id, id).await?;
    let gamification = score(&state, &user_id, Activity::BalanceViewed).await;

    Ok(Json(ActionResponse {
        data: BalanceView {
            account_id: found.id,
            name: found.name,
            balance: found.balance,
        },
        gamification,
    }))
}
