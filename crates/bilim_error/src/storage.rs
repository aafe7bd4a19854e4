//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the directory holding a store file
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// File contents could not be decoded
    #[display("Corrupt store file: {}", _0)]
    Corrupt(String),
    /// Record could not be encoded
    #[display("Failed to encode record: {}", _0)]
    Encode(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use bilim_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileRead("bot_stats.json".to_string()));
/// assert!(format!("{}", err).contains("bot_stats.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
