use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, Level};

use kassa_core::Catalog;
use kassa_server::config::{Config, TransportMode};
use kassa_server::polling::polling_loop;
use kassa_server::webhook::run_webhook_server;
use kassa_server::{AppState, Router, SessionStore, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    info!("Starting kassa ticket bot");

    let config = Config::from_env().context("Failed to load configuration from environment")?;

    let telegram = TelegramClient::new(&config.bot_token);
    let me = telegram
        .get_me()
        .await
        .context("Failed to authenticate with the Telegram Bot API")?;
    info!(
        "Authenticated as {} (@{})",
        me.first_name,
        me.username.as_deref().unwrap_or("unknown")
    );

    let catalog = Arc::new(Catalog::sample());
    info!("Catalog seeded with {} events", catalog.list().len());

    let sessions = SessionStore::new(catalog.clone());
    let router = Router::new(catalog, sessions);

    let state = Arc::new(AppState {
        telegram,
        router,
        webhook_secret_token: config.webhook_secret_token.clone(),
    });

    match config.mode {
        TransportMode::Polling => {
            tokio::select! {
                result = polling_loop(state.clone()) => result?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping polling");
                }
            }
        }
        TransportMode::Webhook => {
            run_webhook_server(state, &config).await?;
        }
    }

    Ok(())
}
