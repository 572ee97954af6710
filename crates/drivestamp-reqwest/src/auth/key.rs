//! Service account key files.

use std::fmt;
use std::path::Path;

use drivestamp_core::{Error, Result};
use serde::Deserialize;

use super::TRACING_TARGET;

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// The fields of a Google service account JSON key that authentication needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Key type; must be `service_account` when present.
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Service account email, used as the assertion issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub(crate) private_key: String,
    /// Identifier of the private key, sent as the `kid` header.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// OAuth token endpoint, also the assertion audience.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

impl ServiceAccountKey {
    /// Parses a key from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            Error::configuration()
                .with_message(format!("malformed service account key: {e}"))
                .with_source(e)
        })?;
        key.validate()?;
        Ok(key)
    }

    /// Reads and parses a JSON key file.
    ///
    /// A missing or unreadable file is a configuration error.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "Loading service account key"
        );

        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "Failed to read service account key"
            );
            Error::configuration()
                .with_message(format!("cannot read credentials file '{}': {e}", path.display()))
                .with_source(e)
        })?;

        let key = Self::from_json(&json)?;

        tracing::debug!(
            target: TRACING_TARGET,
            client_email = %key.client_email,
            token_uri = %key.token_uri,
            "Service account key loaded"
        );

        Ok(key)
    }

    /// Overrides the token endpoint.
    #[must_use]
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(key_type) = self.key_type.as_deref()
            && key_type != SERVICE_ACCOUNT_TYPE
        {
            return Err(Error::configuration().with_message(format!(
                "unsupported credentials type '{key_type}', expected '{SERVICE_ACCOUNT_TYPE}'"
            )));
        }

        if self.client_email.trim().is_empty() {
            return Err(Error::configuration().with_message("service account key has no client_email"));
        }

        if self.private_key.trim().is_empty() {
            return Err(Error::configuration().with_message("service account key has no private_key"));
        }

        Ok(())
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}
