use dotenvy::dotenv;
use penny_quest::{
    api::{self, AppState},
    bot::{self, BotData},
    config::{database, server::ServerConfig, settings},
    errors::Result,
    notify::{BotNotifier, DiscordNotifier, LogNotifier, NotificationDispatcher},
};
use std::{future::IntoFuture, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Gamification settings and server environment
    let settings = settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;
    let rules = Arc::new(settings.rules()?);
    let server_config = ServerConfig::from_env()?;
    info!(
        host = %server_config.host,
        port = server_config.port,
        "Loaded server configuration"
    );

    // 4. Database (schema first, then the pool)
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;
    info!("Database initialized successfully");

    // 5. Notification worker
    let notifier: Arc<dyn BotNotifier> =
        match (&server_config.discord_token, server_config.notify_channel_id) {
            (Some(token), Some(channel_id)) => {
                info!(channel_id = channel_id.get(), "Sending notifications to Discord");
                Arc::new(DiscordNotifier::new(token, channel_id))
            }
            _ => {
                info!("No notification channel configured, notifications go to the log");
                Arc::new(LogNotifier)
            }
        };
    let (dispatcher, _worker) = NotificationDispatcher::start(notifier, settings.notifications);

    // 6. HTTP server, plus the bot when a token is configured
    let state = AppState::new(db.clone(), Arc::clone(&rules), dispatcher.clone());
    let app = api::build_router(state, &server_config)?;
    let listener = tokio::net::TcpListener::bind(server_config.bind_address()).await?;
    info!(addr = %server_config.bind_address(), "Starting HTTP server");
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    match server_config.discord_token.as_deref() {
        Some(token) => {
            let data = BotData::new(db, rules, dispatcher);
            tokio::select! {
                result = server => result?,
                result = bot::run_bot(token, data) => {
                    if let Err(e) = &result {
                        error!("Discord bot stopped: {e}");
                    }
                    result?;
                }
            }
        }
        None => {
            warn!("DISCORD_BOT_TOKEN not set, running without the Discord bot");
            server.await?;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C so the server can drain in-flight requests.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
