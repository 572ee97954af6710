//! Bearer token acquisition and caching.

use std::fmt;

use drivestamp_core::{Error, ErrorKind, Result};
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{Credentials, ServiceAccountKey, TRACING_TARGET};

/// OAuth scope granting full Drive access.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Grant type for exchanging a signed assertion.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion.
const ASSERTION_LIFETIME: SignedDuration = SignedDuration::from_hours(1);

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN: SignedDuration = SignedDuration::from_secs(60);

/// Used when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

struct CachedToken {
    access_token: String,
    expires_at: Timestamp,
}

impl CachedToken {
    fn is_fresh(&self, now: Timestamp) -> bool {
        now.checked_add(REFRESH_MARGIN)
            .is_ok_and(|deadline| deadline < self.expires_at)
    }
}

enum TokenSource {
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        encoding_key: EncodingKey,
        cache: Mutex<Option<CachedToken>>,
    },
}

/// Hands out bearer tokens for Drive calls.
pub(crate) struct Authenticator {
    http: Client,
    source: TokenSource,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Authenticator");
        match &self.source {
            TokenSource::Static(_) => debug.field("source", &"static"),
            TokenSource::ServiceAccount { key, .. } => debug.field("source", key),
        };
        debug.finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Prepares an authenticator; the private key is parsed eagerly.
    pub fn new(http: Client, credentials: Credentials) -> Result<Self> {
        let source = match credentials {
            Credentials::AccessToken(token) => {
                if token.trim().is_empty() {
                    return Err(Error::configuration().with_message("access token must not be empty"));
                }
                TokenSource::Static(token)
            }
            Credentials::ServiceAccount(key) => {
                let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
                    .map_err(crate::Error::from)?;
                TokenSource::ServiceAccount {
                    key,
                    encoding_key,
                    cache: Mutex::new(None),
                }
            }
        };

        Ok(Self { http, source })
    }

    /// Returns a bearer token, exchanging a fresh assertion when the cached one is stale.
    pub async fn bearer_token(&self) -> Result<String> {
        let (key, encoding_key, cache) = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount {
                key,
                encoding_key,
                cache,
            } => (key, encoding_key, cache),
        };

        let mut cached = cache.lock().await;
        let now = Timestamp::now();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        let token = self.exchange(key, encoding_key, now).await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn exchange(
        &self,
        key: &ServiceAccountKey,
        encoding_key: &EncodingKey,
        now: Timestamp,
    ) -> Result<CachedToken> {
        let assertion = sign_assertion(key, encoding_key, now)?;

        tracing::debug!(
            target: TRACING_TARGET,
            client_email = %key.client_email,
            token_uri = %key.token_uri,
            "Exchanging service account assertion"
        );

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT_TYPE),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(crate::Error::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<TokenErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.error))
                .unwrap_or(body);

            // Transient token endpoint failures are retried like Drive calls.
            let code = status.as_u16();
            if ErrorKind::from_status(code).is_retryable() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    status = code,
                    reason = %reason,
                    "Token endpoint unavailable"
                );
                return Err(Error::from_status(code)
                    .with_message(format!("token exchange failed: {reason}")));
            }

            tracing::error!(
                target: TRACING_TARGET,
                status = code,
                reason = %reason,
                "Token exchange rejected"
            );

            return Err(Error::authentication().with_message(format!(
                "token exchange rejected with HTTP {code}: {reason}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            Error::authentication()
                .with_message("malformed token response")
                .with_source(e)
        })?;

        let lifetime = SignedDuration::from_secs(token.expires_in.max(0));
        let expires_at = now.checked_add(lifetime).unwrap_or(now);

        tracing::debug!(
            target: TRACING_TARGET,
            expires_in = token.expires_in,
            "Access token issued"
        );

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

/// Signs the RS256 assertion for `key`.
pub(crate) fn sign_assertion(
    key: &ServiceAccountKey,
    encoding_key: &EncodingKey,
    now: Timestamp,
) -> Result<String> {
    let issued_at = now.as_second();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: DRIVE_SCOPE.to_owned(),
        aud: key.token_uri.clone(),
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME.as_secs(),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    jsonwebtoken::encode(&header, &claims, encoding_key).map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET,
            error = %e,
            "Failed to sign assertion"
        );
        crate::Error::from(e).into()
    })
}
