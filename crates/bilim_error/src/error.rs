//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, ServiceError, StorageError};

/// Every error condition the publisher can raise.
///
/// # Examples
///
/// ```
/// use bilim_error::{BilimError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: BilimError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BilimErrorKind {
    /// HTTP transport error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Usage ledger or history store error
    #[from(StorageError)]
    Storage(StorageError),
    /// External service error
    #[from(ServiceError)]
    Service(ServiceError),
}

/// Bilim error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bilim_error::{BilimErrorKind, BilimResult, ConfigError};
///
/// fn might_fail() -> BilimResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), BilimErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bilim Error: {}", _0)]
pub struct BilimError(Box<BilimErrorKind>);

impl BilimError {
    /// Create a new error from a kind.
    pub fn new(kind: BilimErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BilimErrorKind {
        &self.0
    }

    /// Whether this error wraps a transient external service failure.
    pub fn is_transient(&self) -> bool {
        match self.kind() {
            BilimErrorKind::Service(e) => e.is_transient(),
            BilimErrorKind::Http(_) => true,
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to BilimErrorKind
impl<T> From<T> for BilimError
where
    T: Into<BilimErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for bilim operations.
pub type BilimResult<T> = std::result::Result<T, BilimError>;
