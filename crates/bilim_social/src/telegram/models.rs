//! JSON models for the Telegram Bot API.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramEnvelope<T> {
    /// Whether the request succeeded
    pub ok: bool,
    /// Payload when `ok` is true
    pub result: Option<T>,
    /// Human-readable failure description
    #[serde(default)]
    pub description: Option<String>,
    /// Numeric error code mirroring the HTTP status
    #[serde(default)]
    pub error_code: Option<u16>,
}

/// Body of a `sendPhoto` call.
#[derive(Debug, Clone, Serialize, PartialEq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct SendPhotoRequest {
    /// Numeric chat id or `@channelusername`
    chat_id: String,
    /// Photo URL
    photo: String,
    /// Caption text
    caption: String,
}

/// Chat a message belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters)]
pub struct TelegramChat {
    /// Chat id
    id: i64,
    /// Chat title (groups and channels)
    #[serde(default)]
    title: Option<String>,
    /// Public username
    #[serde(default)]
    username: Option<String>,
}

/// A message as returned by the Bot API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters)]
pub struct TelegramMessage {
    /// Message id within the chat
    message_id: i64,
    /// Unix timestamp
    #[serde(default)]
    date: i64,
    /// Chat the message was sent to
    #[serde(default)]
    chat: Option<TelegramChat>,
    /// Text body
    #[serde(default)]
    text: Option<String>,
    /// Photo caption
    #[serde(default)]
    caption: Option<String>,
}

/// Incoming update from `getUpdates`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, derive_getters::Getters)]
pub struct TelegramUpdate {
    /// Monotonic update id
    update_id: i64,
    /// New private or group message
    #[serde(default)]
    message: Option<TelegramMessage>,
    /// New channel post
    #[serde(default)]
    channel_post: Option<TelegramMessage>,
}
