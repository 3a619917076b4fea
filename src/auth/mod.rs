//! Authentication for the Lucidchart API.
//!
//! Two credentials are in play:
//! - an OAuth2 access token, obtained by the [`TokenManager`] through the
//!   authorization-code or refresh-token grant and refreshed when it expires;
//! - a static API key, supplied through configuration and never refreshed.
//!
//! Each API call picks one with [`AuthMode`].
//!
//! # Thread Safety
//!
//! The token manager holds its token behind a single async mutex. The lock is
//! held for the whole of `get_token`, including any exchange with the token
//! endpoint, so at most one exchange is ever in flight and concurrent callers
//! observe the token the first one obtained.

use crate::config::OAuth2Credentials;
use crate::errors::{
    AuthenticationError, ConfigurationError, LucidchartError, LucidchartResult, ResponseError,
    ValidationError,
};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::types::TokenErrorResponse;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Which bearer credential an API call is made with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// OAuth2 access token from the token manager.
    OAuth2,
    /// Static API key.
    ApiKey,
}

/// OAuth2 token as issued by the token endpoint.
#[derive(Clone, Deserialize)]
pub struct OAuth2Token {
    /// Bearer access token.
    pub access_token: SecretString,

    /// Refresh token issued alongside the access token.
    #[serde(default)]
    pub refresh_token: Option<SecretString>,

    /// Absolute expiry in epoch milliseconds.
    pub expires: i64,

    /// Relative lifetime in seconds, informational only.
    #[serde(default)]
    pub expires_in: Option<i64>,

    /// Token type, usually `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,

    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Client the token was issued to.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Account the token was issued for.
    #[serde(default, rename = "accountId")]
    pub account_id: Option<i64>,
}

impl OAuth2Token {
    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.expires).single()
    }

    /// Checks if the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now > expires_at,
            None => true,
        }
    }

    /// Checks if the token is expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl std::fmt::Debug for OAuth2Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Token")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires", &self.expires)
            .field("token_type", &self.token_type)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[derive(Serialize)]
struct AuthorizationCodeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    redirect_uri: &'a str,
}

#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Owns the OAuth2 token for the lifetime of the process.
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    token_url: Url,
    credentials: OAuth2Credentials,
    token: Mutex<Option<OAuth2Token>>,
}

impl TokenManager {
    /// Creates a token manager. No exchange happens until the first `get_token`.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_url: Url,
        credentials: OAuth2Credentials,
    ) -> Self {
        Self {
            transport,
            token_url,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Returns a valid token, obtaining or refreshing one if needed.
    pub async fn get_token(&self) -> LucidchartResult<OAuth2Token> {
        let mut held = self.token.lock().await;

        if let Some(token) = held.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
            info!(expires = token.expires, "OAuth2 token expired, refreshing");
        }

        let token = self.obtain(held.as_ref()).await?;
        *held = Some(token.clone());
        Ok(token)
    }

    /// Refreshes the token after upstream rejected `rejected_access_token`.
    ///
    /// If another caller already replaced that token, the replacement is
    /// returned without a second exchange.
    pub async fn refresh_rejected(
        &self,
        rejected_access_token: &str,
    ) -> LucidchartResult<OAuth2Token> {
        let mut held = self.token.lock().await;

        if let Some(token) = held.as_ref() {
            if token.access_token.expose_secret() != rejected_access_token && !token.is_expired() {
                debug!("Token already replaced by a concurrent refresh");
                return Ok(token.clone());
            }
        }

        let token = match held.as_ref() {
            Some(current) => self.refresh(current.refresh_token.as_ref()).await?,
            None => self.obtain(None).await?,
        };
        *held = Some(token.clone());
        Ok(token)
    }

    async fn obtain(&self, current: Option<&OAuth2Token>) -> LucidchartResult<OAuth2Token> {
        if let Some(current) = current {
            return self.refresh(current.refresh_token.as_ref()).await;
        }

        if self.credentials.refresh_token.is_some() {
            return self.refresh(None).await;
        }

        let code = self.credentials.code.as_ref().ok_or_else(|| {
            ConfigurationError::MissingCredentials(
                "no authorization code or refresh token to obtain an OAuth2 token".to_string(),
            )
        })?;

        info!("Exchanging authorization code for OAuth2 token");

        let body = AuthorizationCodeRequest {
            code: code.expose_secret(),
            client_id: &self.credentials.client_id,
            client_secret: self.credentials.client_secret.expose_secret(),
            grant_type: "authorization_code",
            redirect_uri: &self.credentials.redirect_url,
        };
        let token = self.exchange(&body).await?;

        debug!(expires = token.expires, "OAuth2 token received");
        Ok(token)
    }

    /// Exchanges the held refresh token, or the configured one if none was issued yet.
    async fn refresh(&self, issued: Option<&SecretString>) -> LucidchartResult<OAuth2Token> {
        let refresh_token = issued
            .or(self.credentials.refresh_token.as_ref())
            .ok_or_else(|| {
                AuthenticationError::NoRefreshMaterial(
                    "no refresh token was issued or configured".to_string(),
                )
            })?;

        info!("Refreshing OAuth2 token");

        let body = RefreshTokenRequest {
            refresh_token: refresh_token.expose_secret(),
            client_id: &self.credentials.client_id,
            client_secret: self.credentials.client_secret.expose_secret(),
            grant_type: "refresh_token",
        };
        let mut token = self.exchange(&body).await?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.clone());
        }

        debug!(expires = token.expires, "Refreshed OAuth2 token received");
        Ok(token)
    }

    async fn exchange<B: Serialize>(&self, body: &B) -> LucidchartResult<OAuth2Token> {
        let body = serde_json::to_vec(body).map_err(|e| {
            AuthenticationError::RefreshFailed(format!("failed to encode token request: {}", e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.token_url.clone(),
                headers,
                body: Some(Bytes::from(body)),
                timeout: None,
            })
            .await?;

        let status = response.status;
        if status.is_client_error() {
            let transport = format!("token endpoint returned HTTP {}", status);
            let parsed: TokenErrorResponse = match serde_json::from_slice(&response.body) {
                Ok(parsed) => parsed,
                Err(e) => {
                    return Err(AuthenticationError::RefreshFailed(format!(
                        "{}; failed to decode error body: {}",
                        transport, e
                    ))
                    .into())
                }
            };
            return Err(ValidationError {
                status: status.as_u16(),
                error: parsed.error,
                description: parsed.error_description,
                transport,
            }
            .into());
        }

        if !status.is_success() {
            return Err(AuthenticationError::RefreshFailed(format!(
                "token endpoint returned HTTP {}: {}",
                status,
                String::from_utf8_lossy(&response.body)
            ))
            .into());
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            LucidchartError::Response(ResponseError::DeserializationError(format!(
                "failed to decode token response: {}",
                e
            )))
        })
    }
}
