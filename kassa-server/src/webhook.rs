//! Push transport: platform-delivered updates over an HTTP endpoint.
//!
//! A single `POST /webhook` route accepts Telegram update payloads; the
//! endpoint is registered with the platform at startup and deregistered on
//! shutdown. When a secret token is configured, deliveries missing the
//! matching `X-Telegram-Bot-Api-Secret-Token` header are rejected.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::post,
    Json, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dispatch::process_update;
use crate::telegram::Update;
use crate::AppState;

pub const WEBHOOK_PATH: &str = "/webhook";

const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

async fn verify_secret_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(expected) = &state.webhook_secret_token {
        let provided = request
            .headers()
            .get(SECRET_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or(StatusCode::UNAUTHORIZED)?;
        if provided != expected {
            error!("Invalid webhook secret token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }
    Ok(next.run(request).await)
}

async fn telegram_webhook_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<Update>,
) -> StatusCode {
    // Acknowledge immediately; the platform retries slow deliveries.
    tokio::spawn(async move {
        process_update(state, update).await;
    });
    StatusCode::OK
}

pub fn webhook_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(WEBHOOK_PATH, post(telegram_webhook_handler))
        .layer(middleware::from_fn_with_state(state, verify_secret_token))
}

/// Serve the webhook endpoint until shutdown, managing registration with
/// the platform around it.
pub async fn run_webhook_server(state: Arc<AppState>, config: &Config) -> Result<()> {
    match &config.webhook_host {
        Some(host) => {
            let url = format!("{host}{WEBHOOK_PATH}");
            state
                .telegram
                .set_webhook(&url, config.webhook_secret_token.as_deref())
                .await
                .context("Failed to register webhook")?;
        }
        None => {
            warn!("WEBHOOK_HOST is not set, skipping webhook registration");
        }
    }

    let app = Router::new()
        .merge(webhook_router(state.clone()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state.clone());

    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Server listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server failed")?;

    // Deregister on the way out so the platform stops delivering here.
    state.telegram.delete_webhook(false).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    } else {
        info!("Shutdown signal received");
    }
}
