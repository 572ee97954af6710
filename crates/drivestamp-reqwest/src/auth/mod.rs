//! Google service-account authentication.
//!
//! A [`ServiceAccountKey`] signs a short-lived RS256 assertion that is
//! exchanged at the key's token endpoint for a bearer token. Tokens are cached
//! and refreshed shortly before they expire.

mod key;
mod token;

pub use key::{DEFAULT_TOKEN_URI, ServiceAccountKey};
pub(crate) use token::Authenticator;
pub use token::{DRIVE_SCOPE, JWT_BEARER_GRANT_TYPE};

/// Tracing target for authentication.
pub const TRACING_TARGET: &str = "drivestamp_reqwest::auth";

/// Credentials used to authorize Drive calls.
#[derive(Clone)]
pub enum Credentials {
    /// A service account key, exchanged for short-lived bearer tokens.
    ServiceAccount(ServiceAccountKey),
    /// A pre-issued OAuth access token, sent as is.
    AccessToken(String),
}

impl Credentials {
    /// Loads service account credentials from a JSON key file.
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> drivestamp_core::Result<Self> {
        ServiceAccountKey::from_file(path)
            .await
            .map(Self::ServiceAccount)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceAccount(key) => f.debug_tuple("ServiceAccount").field(key).finish(),
            Self::AccessToken(_) => f.debug_tuple("AccessToken").field(&"<redacted>").finish(),
        }
    }
}
