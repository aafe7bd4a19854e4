//! Configuration error types.

/// Configuration error with source location.
///
/// Raised for missing secrets, unreadable configuration files and values
/// that fail validation. These errors are fatal at startup.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use bilim_error::ConfigError;
    ///
    /// let err = ConfigError::new("BOT_TOKEN is not set");
    /// assert!(err.message.contains("BOT_TOKEN"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
