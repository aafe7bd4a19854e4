//! Trait definitions for the bilim fact publisher.
//!
//! Every external collaborator sits behind one of these traits so the publish
//! cycle can be driven by in-memory fakes in tests:
//!
//! - [`TextDriver`] - generative-text service
//! - [`PhotoSearch`] - stock-photo search
//! - [`Channel`] - messaging channel
//! - [`FactSource`] / [`ImageSource`] - never-failing lookups built on the above
//! - [`UsageLedger`] / [`HistoryStore`] - persisted state

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{
    Channel, FactSource, HistoryStore, ImageSource, PhotoSearch, TextDriver, UsageLedger,
};
pub use types::{MessageId, Photo, PhotoSources, TextResponse};
