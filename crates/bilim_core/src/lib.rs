//! Core data types for the bilim fact publisher.
//!
//! This crate holds the data model shared by every other crate: generated facts
//! and their topics, the normalized deduplication key, usage accounting records,
//! and published-history entries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fact;
mod history;
mod normalize;
mod sourced;
mod usage;

pub use fact::{CONNECTIVE, GeneratedFact, Topic, parse_keyword_list};
pub use history::HistoryEntry;
pub use normalize::{NormalizedKey, normalize_fact};
pub use sourced::Sourced;
pub use usage::{TokenUsage, UsagePricing, UsageRecord, UsageReport};
