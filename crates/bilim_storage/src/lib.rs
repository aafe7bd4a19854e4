//! Persisted state for the bilim fact publisher.
//!
//! Two stores are provided, each with a JSON-file backend and an in-memory
//! backend for tests:
//!
//! - **Usage ledger**: a single JSON object with cumulative token counts, the
//!   estimated spend and the number of generated facts
//! - **History store**: a JSON array of every published fact's normalized text
//!
//! Both file backends load the file once when opened and rewrite it in full
//! after every mutation. They assume a single writer process.
//!
//! # Example
//!
//! ```rust
//! use bilim_core::{TokenUsage, UsagePricing};
//! use bilim_interface::UsageLedger;
//! use bilim_storage::JsonUsageLedger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ledger = JsonUsageLedger::open("bot_stats.json", UsagePricing::default()).await?;
//! let record = ledger.record(TokenUsage::new(250, 60)).await?;
//! assert_eq!(*record.facts_generated(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod json_file;
mod ledger;

pub use bilim_error::{StorageError, StorageErrorKind};
pub use history::{JsonHistoryStore, MemoryHistoryStore};
pub use ledger::{JsonUsageLedger, MemoryUsageLedger, log_usage_report};
