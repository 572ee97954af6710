//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── folder_id, modified_time      # Positional arguments
//! ├── recursive, dry_run, verbose   # Run switches
//! ├── credentials                   # Service account key path
//! ├── retry: RetryConfig            # Attempts and backoff
//! └── http: ReqwestConfig           # Timeout, user agent, API URL
//! ```
//!
//! Every option can also be provided through an environment variable.
//!
//! # Example
//!
//! ```bash
//! drivestamp -r -c key.json 1euqMiuoKLH 2025-10-20T09:20:25.000Z
//!
//! GOOGLE_APPLICATION_CREDENTIALS=key.json drivestamp --dry-run 1euqMiuoKLH 2025-10-20T09:20:25.000Z
//! ```

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use drivestamp_core::{ModifiedTime, RetryConfig, TraversalOptions};
use drivestamp_reqwest::ReqwestConfig;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;
use crate::error::{CliError, CliResult};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "drivestamp")]
#[command(about = "Update Google Drive 'modifiedTime' for a folder and its files.")]
#[command(version)]
pub struct Cli {
    /// Drive folder ID (the long id from the folder's URL).
    #[arg(value_name = "FOLDER_ID")]
    pub folder_id: String,

    /// New modified time in RFC 3339 format (e.g. 2025-10-20T09:20:25.000Z).
    #[arg(value_name = "MODIFIED_TIME")]
    pub modified_time: String,

    /// Recursively update nested subfolders and files.
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Don't perform updates; log what would be changed.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Verbose logging (debug).
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Path to the service account JSON key.
    #[arg(
        short = 'c',
        long = "credentials",
        env = "GOOGLE_APPLICATION_CREDENTIALS",
        value_name = "PATH"
    )]
    pub credentials: Option<PathBuf>,

    /// Retry policy for transient failures.
    #[clap(flatten)]
    pub retry: RetryConfig,

    /// HTTP client configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Parses the requested modification time.
    pub fn modified_time(&self) -> CliResult<ModifiedTime> {
        ModifiedTime::parse(self.modified_time.as_str())
            .map_err(|_| CliError::InvalidTimestamp(self.modified_time.clone()))
    }

    /// Returns the credentials path, treating an empty value as absent.
    pub fn credentials_path(&self) -> CliResult<&Path> {
        self.credentials
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(CliError::MissingCredentials)
    }

    /// Validates the arguments that need no network access.
    ///
    /// Checks run in order: timestamp, credentials path, then the remaining
    /// configuration.
    pub fn validate(&self) -> CliResult<()> {
        self.modified_time()?;
        self.credentials_path()?;

        if self.folder_id.trim().is_empty() {
            return Err(CliError::InvalidArgument("folder id must not be empty".into()));
        }

        self.retry.validate().map_err(CliError::InvalidConfig)?;
        self.http.validate().map_err(CliError::InvalidConfig)?;
        Ok(())
    }

    /// Builds the traversal options selected on the command line.
    pub fn traversal_options(&self) -> TraversalOptions {
        TraversalOptions::default()
            .with_recursive(self.recursive)
            .with_dry_run(self.dry_run)
            .with_retry(self.retry.clone())
    }

    /// Logs the configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            folder_id = %self.folder_id,
            recursive = self.recursive,
            dry_run = self.dry_run,
            credentials = ?self.credentials,
            max_attempts = self.retry.max_attempts,
            backoff_base_ms = self.retry.backoff_base_ms,
            http_timeout_secs = self.http.http_timeout,
            drive_api_url = %self.http.drive_api_url,
            "Run configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
