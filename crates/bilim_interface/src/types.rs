//! Value types exchanged across the trait seams.

use bilim_core::TokenUsage;
use serde::{Deserialize, Serialize};

/// Reply from the generative-text service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResponse {
    /// Concatenated text blocks of the reply.
    pub text: String,
    /// Tokens consumed by the call.
    pub usage: TokenUsage,
}

/// One photo record from the stock-photo service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Original width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Whether the account behind the API key liked the photo.
    #[serde(default)]
    pub liked: bool,
    /// Photo page URL.
    #[serde(default)]
    pub url: String,
    /// Rendition URLs.
    pub src: PhotoSources,
}

/// Rendition URLs of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoSources {
    /// Large rendition, the one published.
    pub large: String,
}

/// Identifier of a published channel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct MessageId(pub i64);
