use crate::api::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Whether the database answered a ping
    pub db_healthy: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.db.ping().await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
