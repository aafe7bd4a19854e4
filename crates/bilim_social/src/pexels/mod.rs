//! Pexels stock-photo search and the image cascade built on it.

mod client;
mod resolver;

pub use client::{DEFAULT_PER_PAGE, PexelsClient};
pub use resolver::{
    FALLBACK_IMAGE_URL, ImageResolver, is_quality_photo, search_queries, select_photo,
};
