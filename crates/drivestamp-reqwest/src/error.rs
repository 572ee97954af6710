//! Internal error types for drivestamp-reqwest.

use thiserror::Error;

/// Result type alias for drivestamp-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for drivestamp-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Signing the token assertion failed.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    /// Reading the credentials file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for drivestamp_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    drivestamp_core::Error::network_error()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    drivestamp_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    drivestamp_core::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    drivestamp_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => drivestamp_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Jwt(e) => drivestamp_core::Error::configuration()
                .with_message("Invalid service account private key")
                .with_source(e),
            Error::Io(e) => drivestamp_core::Error::configuration()
                .with_message(format!("Cannot read credentials file: {e}"))
                .with_source(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use drivestamp_core::ErrorKind;

    use super::*;

    #[test]
    fn io_errors_are_configuration_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = drivestamp_core::Error::from(Error::Io(io));
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert!(!error.is_retryable());
    }

    #[test]
    fn serde_errors_are_serialization_errors() {
        let serde = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = drivestamp_core::Error::from(Error::Serde(serde));
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
