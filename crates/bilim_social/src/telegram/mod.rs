//! Telegram Bot API integration.

mod channel;
mod client;
mod models;
mod poller;

pub use channel::TelegramChannel;
pub use client::TelegramClient;
pub use models::{
    SendPhotoRequest, SendPhotoRequestBuilder, TelegramChat, TelegramEnvelope, TelegramMessage,
    TelegramUpdate,
};
pub use poller::UpdatePoller;
