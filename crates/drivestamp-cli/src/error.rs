//! CLI error types with exit codes and recovery suggestions.

use drivestamp_core::{ErrorKind, TIMESTAMP_EXAMPLE};
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = std::result::Result<T, CliError>;

/// Exit code for invalid arguments.
pub const EXIT_USAGE: i32 = 2;

/// Exit code for any other failure.
pub const EXIT_FAILURE: i32 = 1;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum CliError {
    /// The modification time is not an accepted RFC 3339 UTC timestamp.
    #[error("Invalid modified time '{0}'. Provide RFC 3339 like: {example}", example = TIMESTAMP_EXAMPLE)]
    InvalidTimestamp(String),

    /// Neither `--credentials` nor `GOOGLE_APPLICATION_CREDENTIALS` was provided.
    #[error(
        "No credentials path provided. Use --credentials or set GOOGLE_APPLICATION_CREDENTIALS."
    )]
    MissingCredentials,

    /// A positional argument is unusable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A tuning option is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[source] drivestamp_core::Error),

    /// The Drive client could not be built.
    #[error("Failed to build Drive client: {0}")]
    Client(#[source] drivestamp_core::Error),

    /// The traversal aborted.
    #[error("Google Drive API error: {0}")]
    Drive(#[source] drivestamp_core::Error),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidTimestamp(_)
            | Self::MissingCredentials
            | Self::InvalidArgument(_)
            | Self::InvalidConfig(_) => EXIT_USAGE,
            Self::Client(_) | Self::Drive(_) => EXIT_FAILURE,
        }
    }

    /// Returns a unique error code for this error type.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTimestamp(_) => "E001",
            Self::MissingCredentials => "E002",
            Self::InvalidArgument(_) => "E003",
            Self::InvalidConfig(_) => "E004",
            Self::Client(_) => "E005",
            Self::Drive(_) => "E006",
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidTimestamp(_) => {
                Some("Use UTC with a trailing 'Z' and at most 6 fractional digits")
            }
            Self::MissingCredentials => {
                Some("Download a JSON key for a service account with access to the folder")
            }
            Self::InvalidArgument(_) => None,
            Self::InvalidConfig(_) => Some("Run with --help to see accepted values"),
            Self::Client(_) => Some("Check that the credentials file is a valid service account key"),
            Self::Drive(error) => match error.kind() {
                ErrorKind::Authentication => {
                    Some("The service account key was rejected; check it has not been revoked")
                }
                ErrorKind::Authorization => {
                    Some("Share the folder with the service account email with editor access")
                }
                ErrorKind::NotFound => {
                    Some("Check the folder id and that the service account can see it")
                }
                ErrorKind::RetryExhausted => {
                    Some("Drive kept throttling or failing; retry later or raise --max-attempts")
                }
                ErrorKind::NetworkError => {
                    Some("Check network connectivity or raise --http-timeout")
                }
                _ => None,
            },
        }
    }
}
