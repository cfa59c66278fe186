//! Request credentials and token refresh.
//!
//! Credentials travel with each request as an explicit value; nothing here
//! keeps session state between requests.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Header carrying an optional refresh token
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";
/// Header carrying the access token expiry as unix seconds
pub const EXPIRES_AT_HEADER: &str = "x-token-expires-at";

/// Tokens expiring within this window are refreshed before use
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth credentials for one request
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` when the caller did not say; the token is then used as is
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Credentials {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Reads `Authorization: Bearer`, plus the optional refresh-token and
    /// expiry headers
    pub fn from_headers(headers: &HeaderMap) -> AppResult<Self> {
        let access_token = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;

        let refresh_token = headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let expires_at = match headers.get(EXPIRES_AT_HEADER) {
            None => None,
            Some(value) => {
                let seconds: i64 = value
                    .to_str()
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
                    .ok_or_else(|| {
                        AppError::InvalidInput(format!(
                            "{} must be unix seconds",
                            EXPIRES_AT_HEADER
                        ))
                    })?;
                Some(Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
                    AppError::InvalidInput(format!("{} out of range", EXPIRES_AT_HEADER))
                })?)
            }
        };

        Ok(Self {
            access_token: access_token.to_string(),
            refresh_token,
            expires_at,
        })
    }

    /// True when the token is expired or expires within the leeway window
    pub fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .map(|expires_at| expires_at - now < Duration::seconds(EXPIRY_LEEWAY_SECS))
            .unwrap_or(false)
    }
}

/// Exchanges a refresh token for a new access token
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn refresh(&self, credentials: &Credentials) -> AppResult<Credentials>;
}

/// Returns credentials that are safe to use right now, refreshing through
/// `provider` when the token is about to expire
pub async fn ensure_fresh(
    provider: &dyn TokenProvider,
    credentials: Credentials,
) -> AppResult<Credentials> {
    if !credentials.is_expiring(Utc::now()) {
        return Ok(credentials);
    }

    if credentials.refresh_token.is_none() {
        return Err(AppError::Auth(
            "Access token expired and no refresh token was supplied".to_string(),
        ));
    }

    tracing::info!("Access token expiring, refreshing");
    provider.refresh(&credentials).await
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Refreshes tokens against the Spotify accounts service
#[derive(Clone)]
pub struct SpotifyTokenProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    accounts_url: String,
}

impl SpotifyTokenProvider {
    pub fn new(client_id: String, client_secret: String, accounts_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            client_id,
            client_secret,
            accounts_url,
        }
    }
}

#[async_trait::async_trait]
impl TokenProvider for SpotifyTokenProvider {
    async fn refresh(&self, credentials: &Credentials) -> AppResult<Credentials> {
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or_else(|| AppError::Auth("No refresh token available".to_string()))?;

        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Token refresh failed");
            // the accounts service answers 400 invalid_grant for revoked tokens
            return Err(AppError::Auth(format!(
                "Token refresh returned status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;

        Ok(Credentials {
            access_token: token.access_token,
            refresh_token: token
                .refresh_token
                .or_else(|| credentials.refresh_token.clone()),
            expires_at: Some(Utc::now() + Duration::seconds(token.expires_in)),
        })
    }
}
