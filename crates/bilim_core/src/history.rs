//! Published-history entries.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One published fact, as recorded in the history store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct HistoryEntry {
    /// Normalized fact text.
    fact_text: String,
    /// Topic name or primary keyword.
    category: String,
    /// Publication time in the scheduler's timezone.
    timestamp: DateTime<FixedOffset>,
}

impl HistoryEntry {
    /// Creates a history entry.
    pub fn new(
        fact_text: impl Into<String>,
        category: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            fact_text: fact_text.into(),
            category: category.into(),
            timestamp,
        }
    }
}
