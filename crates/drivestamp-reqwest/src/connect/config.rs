//! Configuration for the Drive HTTP client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use drivestamp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default Drive v3 API base URL.
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";

/// Configuration for the reqwest-based Drive client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Timeout for each HTTP request, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "DRIVESTAMP_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    /// User-Agent header sent with every request.
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "DRIVESTAMP_HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub http_user_agent: Option<String>,

    /// Base URL of the Drive v3 API.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "drive-api-url",
            env = "DRIVESTAMP_DRIVE_API_URL",
            default_value = DEFAULT_DRIVE_API_URL
        )
    )]
    #[serde(default = "default_drive_api_url")]
    pub drive_api_url: String,
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_drive_api_url() -> String {
    DEFAULT_DRIVE_API_URL.to_owned()
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            http_timeout: default_http_timeout(),
            http_user_agent: None,
            drive_api_url: default_drive_api_url(),
        }
    }
}

impl ReqwestConfig {
    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_http_timeout(mut self, secs: u64) -> Self {
        self.http_timeout = secs;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.http_user_agent = Some(user_agent.into());
        self
    }

    /// Set the Drive API base URL.
    #[must_use]
    pub fn with_drive_api_url(mut self, url: impl Into<String>) -> Self {
        self.drive_api_url = url.into();
        self
    }

    /// Returns the request timeout, using the default when zero.
    pub fn timeout(&self) -> Duration {
        match self.http_timeout {
            0 => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the User-Agent header, using the default when unset or empty.
    pub fn user_agent(&self) -> String {
        match self.http_user_agent.as_deref() {
            Some(agent) if !agent.trim().is_empty() => agent.to_owned(),
            _ => format!("drivestamp/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Parses the Drive API base URL.
    pub fn api_url(&self) -> Result<Url> {
        let url = Url::parse(&self.drive_api_url).map_err(|e| {
            Error::configuration()
                .with_message(format!("invalid Drive API URL '{}'", self.drive_api_url))
                .with_source(e)
        })?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::configuration().with_message(format!(
                "Drive API URL '{}' must be an http(s) base URL",
                self.drive_api_url
            )));
        }

        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.api_url().map(|_| ())
    }
}
