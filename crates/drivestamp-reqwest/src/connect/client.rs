//! Reqwest-based HTTP client for the Drive v3 API.

use std::path::Path;
use std::sync::Arc;

use drivestamp_core::{DriveService, Error, Result};
use reqwest::Client;
use url::Url;

use super::ReqwestConfig;
use crate::auth::{Authenticator, Credentials};

/// Tracing target for Drive client operations.
pub const TRACING_TARGET: &str = "drivestamp_reqwest::client";

/// Inner client that holds the HTTP client, configuration and credentials.
#[derive(Debug)]
struct DriveClientInner {
    http: Client,
    config: ReqwestConfig,
    api_url: Url,
    auth: Authenticator,
}

/// Reqwest-based Drive client.
///
/// This client implements [`DriveProvider`](drivestamp_core::DriveProvider):
/// each call issues exactly one authorized HTTP request and never retries.
///
/// # Examples
///
/// ```rust,ignore
/// use drivestamp_reqwest::{DriveClient, ReqwestConfig};
///
/// let client = DriveClient::from_credentials_file(ReqwestConfig::default(), "key.json").await?;
/// let service = client.into_service();
/// ```
#[derive(Clone)]
pub struct DriveClient {
    inner: Arc<DriveClientInner>,
}

impl std::fmt::Debug for DriveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl DriveClient {
    /// Creates a new Drive client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API URL or the private key is
    /// invalid, or if the HTTP client cannot be created.
    pub fn new(config: ReqwestConfig, credentials: Credentials) -> Result<Self> {
        let api_url = config.api_url()?;
        let timeout = config.timeout();

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %api_url,
            timeout_ms = timeout.as_millis(),
            "Creating Drive client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| {
                Error::configuration()
                    .with_message("failed to create HTTP client")
                    .with_source(e)
            })?;

        let auth = Authenticator::new(http.clone(), credentials)?;

        let inner = DriveClientInner {
            http,
            config,
            api_url,
            auth,
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Drive client created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a client authenticated with a service account key file.
    pub async fn from_credentials_file(
        config: ReqwestConfig,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let credentials = Credentials::from_file(path).await?;
        Self::new(config, credentials)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Returns a bearer token for the next call.
    pub(crate) async fn bearer_token(&self) -> Result<String> {
        self.inner.auth.bearer_token().await
    }

    /// Builds `{api_url}/files[/{object_id}]`, percent-encoding the id.
    pub(crate) fn files_url(&self, object_id: Option<&str>) -> Result<Url> {
        let mut url = self.inner.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::configuration().with_message("Drive API URL cannot be a base"))?
            .pop_if_empty()
            .push("files")
            .extend(object_id);
        Ok(url)
    }

    /// Converts this client into a [`DriveService`] for use with dependency injection.
    pub fn into_service(self) -> DriveService {
        DriveService::new(self)
    }
}
