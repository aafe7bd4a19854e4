//! Error types for the bilim fact publisher.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use bilim_error::{BilimResult, HttpError};
//!
//! fn fetch_data() -> BilimResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod service;
mod storage;

pub use config::ConfigError;
pub use error::{BilimError, BilimErrorKind, BilimResult};
pub use http::HttpError;
pub use service::{Service, ServiceError, ServiceErrorKind};
pub use storage::{StorageError, StorageErrorKind};
