//! External platform integrations for the bilim fact publisher.
//!
//! # Platforms
//!
//! - `pexels` - photo search ([`PexelsClient`]) and the query cascade that
//!   picks one photo per fact ([`ImageResolver`])
//! - `telegram` - Bot API client ([`TelegramClient`]), the publishing
//!   [`TelegramChannel`] and the long-poll [`UpdatePoller`]
//!
//! Each platform follows the same pattern:
//! - JSON models matching the HTTP API
//! - A client mapping transport and API failures to
//!   [`ServiceError`](bilim_error::ServiceError)
//! - An implementation of the matching `bilim_interface` trait

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod pexels;
mod telegram;

pub use pexels::{
    DEFAULT_PER_PAGE, FALLBACK_IMAGE_URL, ImageResolver, PexelsClient, is_quality_photo,
    search_queries, select_photo,
};
pub use telegram::{
    SendPhotoRequest, SendPhotoRequestBuilder, TelegramChannel, TelegramChat, TelegramClient,
    TelegramEnvelope, TelegramMessage, TelegramUpdate, UpdatePoller,
};
