//! Telegram Bot API transport
//!
//! A thin long-polling client over the HTTPS Bot API. Inbound updates are
//! mapped to router events here; outbound messages and stored files go out
//! through the `ChatTransport` impl. Everything Telegram-specific stays in
//! this module.

use crate::db::FileKind;
use crate::runtime::{ChatTransport, Router, TransportError};
use crate::state_machine::{ButtonAction, ChatId, Event};
use crate::view::OutgoingMessage;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Seconds the server holds a `getUpdates` call open
const POLL_TIMEOUT_SECS: u64 = 30;

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram Bot API client
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        // Request timeout must outlast the long-poll hold.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// One Bot API method call: POST the payload, unwrap the envelope.
    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        payload: &impl Serialize,
    ) -> Result<R, TransportError> {
        let url = format!("{}/{method}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TransportError::Network(format!("Connection failed: {e}"))
                } else {
                    TransportError::Network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read response: {e}")))?;

        let envelope: ApiEnvelope<R> = serde_json::from_str(&body).map_err(|e| {
            TransportError::Decode(format!("Bad API envelope: {e} - body: {body}"))
        })?;

        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(TransportError::Api(description));
        }

        envelope
            .result
            .ok_or_else(|| TransportError::Decode("ok response without result".to_string()))
    }

    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        self.call(
            "getUpdates",
            &GetUpdatesPayload {
                timeout: POLL_TIMEOUT_SECS,
                offset,
                allowed_updates: &["message", "callback_query"],
            },
        )
        .await
    }

    /// Long-poll for updates forever, spawning one routing task per update.
    ///
    /// Poll failures are logged and retried after a short pause; they never
    /// take the process down.
    pub async fn run_polling(&self, router: Arc<Router<TelegramClient>>) {
        let mut offset: Option<i64> = None;

        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed, backing off");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let Some((chat, event)) = event_for_update(&update) else {
                    tracing::debug!(update_id = update.update_id, "Skipping unroutable update");
                    continue;
                };

                let router = router.clone();
                tokio::spawn(async move {
                    router.handle_event(chat, event).await;
                });
            }
        }
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat: ChatId,
        message: &OutgoingMessage,
    ) -> Result<(), TransportError> {
        let payload = SendMessagePayload {
            chat_id: chat,
            text: &message.text,
            reply_markup: reply_markup(message),
        };

        self.call::<serde_json::Value>("sendMessage", &payload)
            .await
            .map(|_| ())
    }

    async fn send_file(
        &self,
        chat: ChatId,
        file_ref: &str,
        kind: FileKind,
        caption: &str,
    ) -> Result<(), TransportError> {
        let (method, field) = match kind {
            FileKind::Document => ("sendDocument", "document"),
            FileKind::Image => ("sendPhoto", "photo"),
        };

        let payload = json!({
            "chat_id": chat,
            field: file_ref,
            "caption": caption,
        });

        self.call::<serde_json::Value>(method, &payload)
            .await
            .map(|_| ())
    }
}

/// Inline keyboard for an outgoing message, if it carries one
fn reply_markup(message: &OutgoingMessage) -> Option<InlineKeyboardMarkup> {
    let keyboard = message.keyboard.as_ref()?;

    Some(InlineKeyboardMarkup {
        inline_keyboard: keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: button.token.clone(),
                    })
                    .collect()
            })
            .collect(),
    })
}

/// Map one update to a routable (chat, event) pair.
///
/// Update kinds outside the table (edits, stickers, joins, ...) map to
/// `None` and are skipped by the polling loop.
pub fn event_for_update(update: &Update) -> Option<(ChatId, Event)> {
    if let Some(callback) = &update.callback_query {
        let chat = callback.message.as_ref()?.chat.id;
        let token = callback.data.as_deref()?;
        return Some((
            chat,
            Event::Button {
                action: ButtonAction::parse(token),
            },
        ));
    }

    let message = update.message.as_ref()?;
    let chat = message.chat.id;

    if let Some(document) = &message.document {
        return Some((
            chat,
            Event::File {
                file_ref: document.file_id.clone(),
                kind: FileKind::Document,
            },
        ));
    }

    // Telegram lists photo sizes smallest first; keep the largest rendition.
    if let Some(photo) = message.photo.last() {
        return Some((
            chat,
            Event::File {
                file_ref: photo.file_id.clone(),
                kind: FileKind::Image,
            },
        ));
    }

    let text = message.text.as_deref()?;
    if let Some(rest) = text.trim().strip_prefix('/') {
        // "/start@lectern_bot extra args" -> "start"
        let name = rest.split_whitespace().next().unwrap_or("");
        let name = name.split('@').next().unwrap_or(name);
        return Some((
            chat,
            Event::Command {
                name: name.to_string(),
            },
        ));
    }

    Some((
        chat,
        Event::Text {
            body: text.to_string(),
        },
    ))
}

// Telegram API types

#[derive(Debug, Serialize)]
struct GetUpdatesPayload {
    timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: ChatId,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    callback_data: String,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    message: Option<IncomingMessage>,
    #[serde(default)]
    callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Chat,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    document: Option<Document>,
    #[serde(default)]
    photo: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Document {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct PhotoSize {
    file_id: String,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    message: Option<IncomingMessage>,
}
