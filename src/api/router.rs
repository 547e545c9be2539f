use super::{AppState, extract::USER_ID_HEADER, handlers};
use crate::{
    config::server::ServerConfig,
    errors::{Error, Result},
};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Builds the application router with tracing and CORS layers.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = build_cors_layer(config)?;

    let api = Router::new()
        .route(
            "/accounts",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route(
            "/accounts/{id}/balance",
            get(handlers::accounts::get_balance),
        )
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/assistant/messages",
            post(handlers::assistant::send_message),
        )
        .route("/gamification/quests", get(handlers::gamification::quests))
        .route(
            "/gamification/profile",
            get(handlers::gamification::profile),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state))
}

/// Builds the CORS layer from the configured origins. An invalid origin is a startup error.
pub fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>().map_err(|e| Error::Config {
                message: format!("Invalid CORS origin '{o}': {e}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .max_age(Duration::from_secs(3600)))
}
