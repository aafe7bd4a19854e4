//! Generative-text integration for the bilim fact publisher.
//!
//! - [`AnthropicClient`] talks to the Anthropic Messages API and implements
//!   [`TextDriver`](bilim_interface::TextDriver)
//! - [`parse`] turns a freeform reply into a [`GeneratedFact`](bilim_core::GeneratedFact)
//! - [`FactGenerator`] ties both together, records token usage, and substitutes
//!   a fixed fallback fact whenever anything goes wrong
//!
//! # Example
//!
//! ```no_run
//! use bilim_interface::FactSource;
//! use bilim_models::{AnthropicClient, FactGenerator};
//! use bilim_storage::MemoryUsageLedger;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = AnthropicClient::new("sk-ant-...", "claude-3-5-sonnet-20241022");
//! let generator = FactGenerator::new(Arc::new(client), Arc::new(MemoryUsageLedger::default()));
//! let fact = generator.generate_fact().await;
//! println!("{}", fact.value().text());
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod generator;
pub mod parse;
mod prompt;

pub use anthropic::{
    AnthropicClient, AnthropicContentBlock, AnthropicMessage, AnthropicRequest,
    AnthropicResponse, AnthropicUsage,
};
pub use generator::{DEFAULT_MAX_TOKENS, FactGenerator, fallback_fact};
pub use prompt::fact_prompt;
