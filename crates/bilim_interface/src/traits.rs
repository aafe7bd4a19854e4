//! Trait definitions for external services and persisted state.

use crate::{MessageId, Photo, TextResponse};
use async_trait::async_trait;
use bilim_core::{
    GeneratedFact, HistoryEntry, NormalizedKey, Sourced, TokenUsage, UsagePricing, UsageRecord,
};
use bilim_error::BilimResult;
use std::collections::HashSet;

/// Generative-text backend.
#[async_trait]
pub trait TextDriver: Send + Sync {
    /// Sends a single user-role prompt and returns the reply text and token usage.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> BilimResult<TextResponse>;

    /// Provider name (e.g., "anthropic").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "claude-3-5-sonnet-20241022").
    fn model_name(&self) -> &str;
}

/// Stock-photo search backend.
#[async_trait]
pub trait PhotoSearch: Send + Sync {
    /// Runs one search and returns the photos on the first result page.
    async fn search(&self, query: &str) -> BilimResult<Vec<Photo>>;
}

/// Messaging channel that receives the published posts.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Sends an image with a caption.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be delivered or the service rejects it.
    async fn publish_photo(&self, photo_url: &str, caption: &str) -> BilimResult<MessageId>;

    /// Human-readable channel identifier for logs.
    fn channel_name(&self) -> &str;
}

/// Produces facts. Never fails: errors are replaced by a fallback fact.
#[async_trait]
pub trait FactSource: Send + Sync {
    /// Generates one fact.
    async fn generate_fact(&self) -> Sourced<GeneratedFact>;
}

/// Finds an image URL for a fact. Never fails: errors yield a fallback URL.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Resolves an image for keywords ordered subject, action, detail, visual.
    async fn resolve_image(&self, keywords: &[String]) -> Sourced<String>;
}

/// Cumulative token and spend accounting.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Adds one generation call and persists the updated record.
    async fn record(&self, usage: TokenUsage) -> BilimResult<UsageRecord>;

    /// Current record.
    async fn snapshot(&self) -> UsageRecord;

    /// Pricing used to derive cost.
    fn pricing(&self) -> &UsagePricing;
}

/// Append-only record of published facts.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Keys of every fact published so far.
    async fn keys(&self) -> BilimResult<HashSet<NormalizedKey>>;

    /// Records a published fact and persists the history.
    async fn append(&self, entry: HistoryEntry) -> BilimResult<()>;

    /// Number of recorded entries.
    async fn count(&self) -> BilimResult<usize>;
}
