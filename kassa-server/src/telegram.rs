//! Hand-rolled Telegram Bot API client.
//!
//! Thin typed wrapper over the HTTP API: every Bot API method is a POST of
//! a JSON body to `https://api.telegram.org/bot<token>/<method>`, and every
//! response is an envelope with an `ok` flag. Failures become `anyhow`
//! errors carrying the API description; callers at the dispatch boundary
//! decide whether a failure is fatal.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use kassa_core::{Button, Notice, Reply};

const API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout passed to `getUpdates`, in seconds.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

// ---------------------------------------------------------------------------
// Wire types: inbound updates

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<TgUser>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TgUser,
    pub message: Option<Message>,
    pub data: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire types: outbound requests

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    parse_mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    show_alert: Option<bool>,
}

#[derive(Debug, Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteWebhookRequest {
    drop_pending_updates: bool,
}

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Build the Telegram inline keyboard for a reply. Empty keyboards map to
/// no markup at all.
pub fn keyboard_markup(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.keyboard.is_empty() {
        return None;
    }
    let inline_keyboard = reply
        .keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match button {
                    Button::Callback { label, data } => InlineKeyboardButton {
                        text: label.clone(),
                        callback_data: Some(data.clone()),
                        url: None,
                    },
                    Button::Url { label, url } => InlineKeyboardButton {
                        text: label.clone(),
                        callback_data: None,
                        url: Some(url.clone()),
                    },
                })
                .collect()
        })
        .collect();
    Some(InlineKeyboardMarkup { inline_keyboard })
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{API_BASE}/bot{bot_token}"),
        }
    }

    async fn call<T, B>(&self, method: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send {method} request"))?;

        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {method} response"))?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(anyhow!("Telegram API error on {method}: {status} - {description}"));
        }
        envelope
            .result
            .ok_or_else(|| anyhow!("Telegram API returned ok without a result for {method}"))
    }

    /// Validate the bot credential and return the bot's own account.
    pub async fn get_me(&self) -> Result<TgUser> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Send a screen as a fresh message.
    pub async fn send_message(&self, chat_id: i64, reply: &Reply) -> Result<Message> {
        self.call(
            "sendMessage",
            &SendMessageRequest {
                chat_id,
                text: &reply.text,
                parse_mode: "HTML",
                reply_markup: keyboard_markup(reply),
            },
        )
        .await
    }

    /// Replace an existing message in place (screen navigation).
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        reply: &Reply,
    ) -> Result<()> {
        // The result is the edited Message (or `true` for inline messages);
        // nothing downstream needs it.
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageTextRequest {
                    chat_id,
                    message_id,
                    text: &reply.text,
                    parse_mode: "HTML",
                    reply_markup: keyboard_markup(reply),
                },
            )
            .await?;
        Ok(())
    }

    /// Acknowledge a button press, optionally with a toast or alert.
    /// Every callback query must be answered or the client keeps a spinner.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        notice: Option<&Notice>,
    ) -> Result<()> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQueryRequest {
                    callback_query_id,
                    text: notice.map(|n| n.text.as_str()),
                    show_alert: notice.map(|n| n.alert),
                },
            )
            .await?;
        Ok(())
    }

    /// Long-poll for new updates. Blocks server-side for up to
    /// `timeout_secs` when there is nothing to deliver.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
            },
        )
        .await
    }

    /// Register `url` as the webhook endpoint for this bot.
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<()> {
        let _: bool = self
            .call("setWebhook", &SetWebhookRequest { url, secret_token })
            .await?;
        info!("Webhook registered: {url}");
        Ok(())
    }

    /// Deregister the webhook. With `drop_pending_updates`, any backlog
    /// queued at the platform is discarded as well.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &DeleteWebhookRequest {
                    drop_pending_updates,
                },
            )
            .await?;
        info!("Webhook deregistered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kassa_core::menu;

    #[test]
    fn test_deserialize_message_update() {
        let json = serde_json::json!({
            "update_id": 100,
            "message": {
                "message_id": 5,
                "chat": {"id": 42, "type": "private"},
                "from": {"id": 42, "is_bot": false, "first_name": "Алиса", "username": "alice"},
                "text": "/start",
                "date": 1700000000
            }
        });
        let update: Update = serde_json::from_value(json).unwrap();
        assert_eq!(update.update_id, 100);
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.from.unwrap().first_name, "Алиса");
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn test_deserialize_callback_update() {
        let json = serde_json::json!({
            "update_id": 101,
            "callback_query": {
                "id": "cbq-1",
                "from": {"id": 42, "is_bot": false, "first_name": "Алиса"},
                "message": {
                    "message_id": 7,
                    "chat": {"id": 42, "type": "private"},
                    "date": 1700000000
                },
                "data": "add_cart_3",
                "chat_instance": "whatever"
            }
        });
        let update: Update = serde_json::from_value(json).unwrap();
        let cbq = update.callback_query.unwrap();
        assert_eq!(cbq.id, "cbq-1");
        assert_eq!(cbq.data.as_deref(), Some("add_cart_3"));
        assert_eq!(cbq.message.unwrap().message_id, 7);
        assert!(cbq.from.username.is_none());
    }

    #[test]
    fn test_keyboard_markup_maps_both_button_kinds() {
        let reply = menu::links();
        let markup = keyboard_markup(&reply).expect("links screen has a keyboard");
        // First row: two url buttons.
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert!(markup.inline_keyboard[0][0].url.is_some());
        assert!(markup.inline_keyboard[0][0].callback_data.is_none());
        // Last row: the back callback.
        let back = &markup.inline_keyboard.last().unwrap()[0];
        assert_eq!(back.callback_data.as_deref(), Some("main_menu"));
        assert!(back.url.is_none());
    }

    #[test]
    fn test_keyboard_markup_empty_keyboard_is_no_markup() {
        let reply = Reply::text_only("hello");
        assert!(keyboard_markup(&reply).is_none());
    }

    #[test]
    fn test_send_message_request_serialization() {
        let reply = menu::main_menu();
        let request = SendMessageRequest {
            chat_id: 42,
            text: &reply.text,
            parse_mode: "HTML",
            reply_markup: keyboard_markup(&reply),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["chat_id"], 42);
        assert_eq!(value["parse_mode"], "HTML");
        assert_eq!(
            value["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "events"
        );
        // Url is absent from callback buttons entirely.
        assert!(value["reply_markup"]["inline_keyboard"][0][0]
            .get("url")
            .is_none());
    }

    #[test]
    fn test_answer_callback_request_skips_missing_notice() {
        let request = AnswerCallbackQueryRequest {
            callback_query_id: "cbq-1",
            text: None,
            show_alert: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("text").is_none());
        assert!(value.get("show_alert").is_none());
    }
}
