//! Per-update processing shared by both transports.
//!
//! Normalizes a Telegram update into a router [`Inbound`], dispatches it,
//! and delivers the outcome. Delivery failures are caught here: they are
//! logged, a single best-effort fallback is attempted, and the surrounding
//! update loop is never crashed by a failed send.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use kassa_core::{Command, Notice};

use crate::router::Inbound;
use crate::telegram::{CallbackQuery, Message, Update};
use crate::AppState;

/// Handle one inbound update to completion.
pub async fn process_update(state: Arc<AppState>, update: Update) {
    if let Some(message) = update.message {
        process_message(&state, message).await;
    } else if let Some(callback) = update.callback_query {
        process_callback(&state, callback).await;
    } else {
        debug!(update_id = update.update_id, "Ignoring update with no message or callback");
    }
}

async fn process_message(state: &AppState, message: Message) {
    let (Some(from), Some(text)) = (message.from, message.text) else {
        debug!(message_id = message.message_id, "Ignoring message without sender or text");
        return;
    };

    let inbound = match Command::parse(&text) {
        Some(command) => Inbound::Command(command),
        None => Inbound::Text(text),
    };
    info!(user = from.id, "Dispatching message");

    let outcome = state.router.handle(from.id, &from.first_name, inbound).await;

    if let Some(screen) = outcome.screen {
        if let Err(e) = state.telegram.send_message(message.chat.id, &screen).await {
            error!(chat = message.chat.id, "Failed to send reply: {e:#}");
        }
    }
}

async fn process_callback(state: &AppState, callback: CallbackQuery) {
    let tag = callback.data.clone().unwrap_or_default();
    info!(user = callback.from.id, tag = %tag, "Dispatching callback");

    let outcome = state
        .router
        .handle(
            callback.from.id,
            &callback.from.first_name,
            Inbound::Callback(tag),
        )
        .await;

    let mut notice = outcome.notice;

    if let Some(screen) = outcome.screen {
        // Navigation edits the message the button lives on; if that message
        // is unavailable or the edit fails, fall back to a fresh message
        // once, in the originating chat.
        let chat_id = callback
            .message
            .as_ref()
            .map(|m| m.chat.id)
            .unwrap_or(callback.from.id);

        let delivered = match callback.message.as_ref() {
            Some(message) => {
                state
                    .telegram
                    .edit_message_text(chat_id, message.message_id, &screen)
                    .await
            }
            None => state
                .telegram
                .send_message(chat_id, &screen)
                .await
                .map(|_| ()),
        };

        if let Err(e) = delivered {
            warn!(chat = chat_id, "Failed to edit message, retrying as a new message: {e:#}");
            if let Err(e) = state.telegram.send_message(chat_id, &screen).await {
                error!(chat = chat_id, "Fallback send failed: {e:#}");
                notice = Some(Notice::alert("Произошла ошибка"));
            }
        }
    }

    if let Err(e) = state
        .telegram
        .answer_callback_query(&callback.id, notice.as_ref())
        .await
    {
        error!(callback_id = %callback.id, "Failed to answer callback query: {e:#}");
    }
}
