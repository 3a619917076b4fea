//! Configuration for the Lucidchart connector.

use crate::errors::{ConfigurationError, LucidchartError, LucidchartResult};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Commercial API endpoint.
pub const COMMERCIAL_API_URL: &str = "https://api.lucid.app";

/// Government-cloud (FedRAMP) API endpoint.
pub const GOVERNMENT_API_URL: &str = "https://api.lucidgov.app";

/// Path of the OAuth2 token endpoint, relative to the API base URL.
pub const TOKEN_PATH: &str = "oauth2/token";

/// Value of the `Lucid-Api-Version` header sent with every request.
pub const API_VERSION: &str = "1";

/// Upstream deployment the connector talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiEnvironment {
    /// `api.lucid.app`.
    #[default]
    Commercial,
    /// `api.lucidgov.app`.
    Government,
}

impl ApiEnvironment {
    /// Returns the API base URL for this deployment.
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Commercial => COMMERCIAL_API_URL,
            ApiEnvironment::Government => GOVERNMENT_API_URL,
        }
    }
}

impl std::str::FromStr for ApiEnvironment {
    type Err = LucidchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" | "" => Ok(ApiEnvironment::Commercial),
            "government" | "gov" | "fedramp" => Ok(ApiEnvironment::Government),
            other => Err(LucidchartError::configuration(format!(
                "unknown API environment: {}",
                other
            ))),
        }
    }
}

/// OAuth2 client credentials and bootstrap material.
#[derive(Clone)]
pub struct OAuth2Credentials {
    /// The application's client id.
    pub client_id: String,
    /// The application's client secret.
    pub client_secret: SecretString,
    /// Redirect URL registered for the authorization-code flow.
    pub redirect_url: String,
    /// One-shot authorization code.
    pub code: Option<SecretString>,
    /// Long-lived refresh token from a previous run.
    pub refresh_token: Option<SecretString>,
}

impl std::fmt::Debug for OAuth2Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("code", &self.code.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Configuration for the Lucidchart client.
#[derive(Clone)]
pub struct LucidchartConfig {
    /// Upstream deployment.
    pub environment: ApiEnvironment,
    /// Base URL for API requests.
    pub base_url: Url,
    /// OAuth2 token endpoint.
    pub token_url: Url,
    /// Static API key for API-key-authenticated endpoints.
    pub(crate) api_key: SecretString,
    /// OAuth2 credentials for OAuth2-authenticated endpoints.
    pub oauth: OAuth2Credentials,
    /// Per-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// User agent string.
    pub user_agent: String,
}

impl LucidchartConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> LucidchartConfigBuilder {
        LucidchartConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LUCID_API_KEY` (required)
    /// - `LUCID_CLIENT_ID`, `LUCID_CLIENT_SECRET`, `LUCID_REDIRECT_URL` (required)
    /// - `LUCID_CODE`, `LUCID_REFRESH_TOKEN` (optional, one is needed to obtain a token)
    /// - `LUCID_ENVIRONMENT` (optional): `commercial` or `government`
    /// - `LUCID_BASE_URL` (optional): overrides the environment's base URL
    pub fn from_env() -> LucidchartResult<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut builder = LucidchartConfigBuilder::new()
            .api_key(var("LUCID_API_KEY").unwrap_or_default())
            .client_id(var("LUCID_CLIENT_ID").unwrap_or_default())
            .client_secret(var("LUCID_CLIENT_SECRET").unwrap_or_default())
            .redirect_url(var("LUCID_REDIRECT_URL").unwrap_or_default());

        if let Some(code) = var("LUCID_CODE") {
            builder = builder.code(code);
        }
        if let Some(refresh_token) = var("LUCID_REFRESH_TOKEN") {
            builder = builder.refresh_token(refresh_token);
        }
        if let Some(environment) = var("LUCID_ENVIRONMENT") {
            builder = builder.environment(environment.parse()?);
        }
        if let Some(base_url) = var("LUCID_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LucidchartResult<()> {
        let required = [
            ("client id", self.oauth.client_id.as_str()),
            ("client secret", self.oauth.client_secret.expose_secret().as_str()),
            ("redirect URL", self.oauth.redirect_url.as_str()),
            ("API key", self.api_key.expose_secret().as_str()),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingCredentials(format!(
                    "{} is required",
                    name
                ))
                .into());
            }
        }

        for url in [&self.base_url, &self.token_url] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigurationError::InvalidConfiguration(format!(
                    "URL must use http or https: {}",
                    url
                ))
                .into());
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for LucidchartConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LucidchartConfig")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url.as_str())
            .field("token_url", &self.token_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("oauth", &self.oauth)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for `LucidchartConfig`.
#[derive(Default)]
pub struct LucidchartConfigBuilder {
    environment: ApiEnvironment,
    base_url: Option<String>,
    token_url: Option<String>,
    api_key: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_url: Option<String>,
    code: Option<String>,
    refresh_token: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl LucidchartConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the upstream deployment.
    pub fn environment(mut self, environment: ApiEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Overrides the base URL (for testing or proxies).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overrides the token endpoint.
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the OAuth2 client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the OAuth2 client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the OAuth2 redirect URL.
    pub fn redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = Some(redirect_url.into());
        self
    }

    /// Sets the authorization code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets a long-lived refresh token.
    pub fn refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> LucidchartResult<LucidchartConfig> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| self.environment.base_url().to_string());
        let base_url = parse_url("base URL", &base_url)?;

        let token_url = match self.token_url {
            Some(url) => parse_url("token URL", &url)?,
            None => join_path(&base_url, TOKEN_PATH)?,
        };

        let secret = |value: Option<String>| {
            value
                .filter(|v| !v.is_empty())
                .map(SecretString::new)
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("integrations-lucidchart/{}", env!("CARGO_PKG_VERSION")));

        let config = LucidchartConfig {
            environment: self.environment,
            base_url,
            token_url,
            api_key: SecretString::new(self.api_key.unwrap_or_default()),
            oauth: OAuth2Credentials {
                client_id: self.client_id.unwrap_or_default(),
                client_secret: SecretString::new(self.client_secret.unwrap_or_default()),
                redirect_url: self.redirect_url.unwrap_or_default(),
                code: secret(self.code),
                refresh_token: secret(self.refresh_token),
            },
            timeout: self.timeout,
            user_agent,
        };

        config.validate()?;

        Ok(config)
    }
}

fn parse_url(name: &str, value: &str) -> LucidchartResult<Url> {
    Url::parse(value).map_err(|e| {
        ConfigurationError::InvalidConfiguration(format!("invalid {} {:?}: {}", name, value, e))
            .into()
    })
}

/// Appends `path` to `base`, keeping any path prefix `base` already carries.
pub(crate) fn join_path(base: &Url, path: &str) -> LucidchartResult<Url> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    parse_url("URL", &joined)
}
