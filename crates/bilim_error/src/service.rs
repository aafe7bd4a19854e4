//! External service error types.

/// External services the publisher talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Service {
    /// Generative-text service (Anthropic Messages API)
    #[display("anthropic")]
    Anthropic,
    /// Stock-photo service (Pexels search API)
    #[display("pexels")]
    Pexels,
    /// Messaging channel (Telegram Bot API)
    #[display("telegram")]
    Telegram,
}

/// Failure conditions when calling an external service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Request could not be sent or the connection dropped
    #[display("{} request failed: {}", service, message)]
    Request {
        /// Service that was called
        service: Service,
        /// Transport error message
        message: String,
    },
    /// Service answered with a non-success HTTP status
    #[display("{} returned HTTP {}: {}", service, status, message)]
    Status {
        /// Service that was called
        service: Service,
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Response body did not match the expected shape
    #[display("{} response could not be decoded: {}", service, message)]
    Decode {
        /// Service that was called
        service: Service,
        /// Decoder message
        message: String,
    },
    /// Service accepted the request but reported a failure in its payload
    #[display("{} rejected the request: {}", service, message)]
    Rejected {
        /// Service that was called
        service: Service,
        /// Description supplied by the service
        message: String,
    },
    /// Response carried no usable content
    #[display("{} returned an empty response", _0)]
    EmptyResponse(Service),
}

impl ServiceErrorKind {
    /// The service this error came from.
    pub fn service(&self) -> Service {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. }
            | Self::Rejected { service, .. } => *service,
            Self::EmptyResponse(service) => *service,
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Connection failures, rate limiting (429) and server-side errors (5xx)
    /// are transient. Everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// External service error with source location tracking.
///
/// # Examples
///
/// ```
/// use bilim_error::{Service, ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::Status {
///     service: Service::Pexels,
///     status: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_transient());
/// assert!(format!("{}", err).contains("pexels returned HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of error that occurred
    pub kind: ServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}
