//! Structured error handling for Drive metadata operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while updating Drive objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Input validation failed.
    InvalidInput,
    /// Configuration error (credentials, client settings).
    Configuration,
    /// Authentication failed.
    Authentication,
    /// Authorization failed.
    Authorization,
    /// Remote object not found.
    NotFound,
    /// Rate limit exceeded (HTTP 429).
    RateLimited,
    /// Transient server failure (HTTP 500 or 503).
    ServerError,
    /// Any other failure status returned by the remote service.
    RemoteError,
    /// Transport-level failure with no HTTP status.
    NetworkError,
    /// Serialization/deserialization error.
    Serialization,
    /// Transient failures outlasted the retry budget.
    RetryExhausted,
    /// Internal error.
    #[default]
    Internal,
}

impl ErrorKind {
    /// Classifies an HTTP failure status.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500 | 503 => Self::ServerError,
            _ => Self::RemoteError,
        }
    }

    /// Check if this error kind is transient and worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError)
    }

    /// Check if this error kind was raised before any network activity.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput | Self::Configuration)
    }
}

/// Structured error type with classification and context tracking.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}{}",
    status.map(|s| format!(" HTTP {s}")).unwrap_or_default(),
    message.as_ref().map(|m| format!(": {m}")).unwrap_or_default()
)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// HTTP status returned by the remote service, if any.
    pub status: Option<u16>,
    /// Primary error message.
    pub message: Option<String>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            status: None,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Creates an error for an HTTP failure status, classified by [`ErrorKind::from_status`].
    pub fn from_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorKind::from_status(status))
        }
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new authentication error.
    pub fn authentication() -> Self {
        Self::new(ErrorKind::Authentication)
    }

    /// Creates a new network error.
    pub fn network_error() -> Self {
        Self::new(ErrorKind::NetworkError)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new retry exhausted error.
    pub fn retry_exhausted() -> Self {
        Self::new(ErrorKind::RetryExhausted)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the HTTP status, if the error came from a remote response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Check if this error is retryable based on its kind.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::from_source(ErrorKind::Internal, error).with_message("I/O operation failed")
    }
}
