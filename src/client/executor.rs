//! Request executor with auth, pagination and error mapping.

use crate::auth::{AuthMode, TokenManager};
use crate::config::{self, LucidchartConfig, API_VERSION};
use crate::errors::{
    AuthenticationError, AuthorizationError, LucidchartError, LucidchartResult, QuotaError,
    RequestError, ResourceError, ResponseError, ServerError,
};
use crate::pagination::{self, Page};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::ApiErrorResponse;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the API version.
pub const API_VERSION_HEADER: &str = "lucid-api-version";

/// Number of times a request is replayed after an authentication failure.
const MAX_AUTH_RETRIES: u32 = 1;

/// An API call ready to be executed.
///
/// The bearer credential is resolved at execution time from `auth`, so a
/// replay after a token refresh picks up the new token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: Url,
    /// JSON body.
    pub body: Option<Bytes>,
    /// Credential to authenticate with.
    pub auth: AuthMode,
}

impl ApiRequest {
    /// Attaches a JSON body.
    pub fn json<B: Serialize>(mut self, body: &B) -> LucidchartResult<Self> {
        let encoded = serde_json::to_vec(body).map_err(|e| {
            LucidchartError::Request(RequestError::InvalidArgument(format!(
                "failed to encode request body: {}",
                e
            )))
        })?;
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Continues a listing from `page_token`.
    pub fn page_token(mut self, page_token: Option<&str>) -> Self {
        pagination::apply_page_token(&mut self.url, page_token);
        self
    }
}

/// A successful response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response body.
    pub body: Bytes,
    /// Cursor extracted from the `Link` header.
    pub next_page_token: Option<String>,
}

/// Request executor that handles HTTP requests with authentication, pagination, and error mapping.
pub struct RequestExecutor {
    config: LucidchartConfig,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenManager>,
}

impl RequestExecutor {
    /// Creates a new request executor.
    pub fn new(
        config: LucidchartConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            config,
            transport,
            tokens,
        }
    }

    /// Builds a request against the configured base URL.
    pub fn request(&self, method: HttpMethod, path: &str, auth: AuthMode) -> LucidchartResult<ApiRequest> {
        Ok(ApiRequest {
            method,
            url: self.build_url(path)?,
            body: None,
            auth,
        })
    }

    /// Builds a full URL from a path.
    pub fn build_url(&self, path: &str) -> LucidchartResult<Url> {
        config::join_path(&self.config.base_url, path)
    }

    /// Executes a request.
    ///
    /// An OAuth2 request rejected with 401 is replayed once with a refreshed
    /// token; a second rejection is returned to the caller. If that refresh
    /// fails, the error carries both the rejection and the refresh failure.
    pub async fn execute(&self, request: &ApiRequest) -> LucidchartResult<ApiResponse> {
        let mut rejected: Option<SecretString> = None;
        let mut retries = 0;

        loop {
            let bearer = match self.bearer(request.auth, rejected.as_ref()).await {
                Ok(bearer) => bearer,
                Err(e) if rejected.is_some() => {
                    return Err(AuthenticationError::RejectedRefreshFailed {
                        status: StatusCode::UNAUTHORIZED.as_u16(),
                        source: Box::new(e),
                    }
                    .into());
                }
                Err(e) => return Err(e),
            };
            let http_request = self.build_http_request(request, &bearer)?;

            debug!(method = ?request.method, url = %request.url, "Sending request");
            let response = self.transport.send(http_request).await?;

            if response.status == StatusCode::UNAUTHORIZED
                && request.auth == AuthMode::OAuth2
                && retries < MAX_AUTH_RETRIES
            {
                retries += 1;
                warn!(
                    method = ?request.method,
                    url = %request.url,
                    "Request unauthenticated, retrying with refreshed token"
                );
                rejected = Some(bearer);
                continue;
            }

            if !response.status.is_success() {
                return Err(handle_error_response(&response));
            }

            let next_page_token = pagination::next_page_token(&response.headers)?;

            return Ok(ApiResponse {
                status: response.status,
                body: response.body,
                next_page_token,
            });
        }
    }

    /// Executes a request and deserializes the JSON response.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> LucidchartResult<T> {
        let response = self.execute(request).await?;
        decode(&response.body)
    }

    /// Executes a listing request and returns one page with its cursor.
    pub async fn execute_page<T: DeserializeOwned>(&self, request: &ApiRequest) -> LucidchartResult<Page<T>> {
        let response = self.execute(request).await?;
        let items: Vec<T> = decode(&response.body)?;
        Ok(Page::new(items, response.next_page_token))
    }

    /// Executes a request whose response body is ignored.
    pub async fn execute_empty(&self, request: &ApiRequest) -> LucidchartResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn bearer(
        &self,
        auth: AuthMode,
        rejected: Option<&SecretString>,
    ) -> LucidchartResult<SecretString> {
        match auth {
            AuthMode::ApiKey => Ok(SecretString::new(self.config.api_key().to_string())),
            AuthMode::OAuth2 => {
                let token = match rejected {
                    Some(rejected) => self.tokens.refresh_rejected(rejected.expose_secret()).await?,
                    None => self.tokens.get_token().await?,
                };
                Ok(token.access_token)
            }
        }
    }

    fn build_http_request(
        &self,
        request: &ApiRequest,
        bearer: &SecretString,
    ) -> LucidchartResult<HttpRequest> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer.expose_secret())).map_err(|e| {
                LucidchartError::Authentication(AuthenticationError::InvalidToken(format!(
                    "invalid auth header: {}",
                    e
                )))
            })?,
        );
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_static(API_VERSION),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.config.user_agent).map_err(|e| {
                LucidchartError::configuration(format!("invalid user agent: {}", e))
            })?,
        );
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        Ok(HttpRequest {
            method: request.method,
            url: request.url.clone(),
            headers,
            body: request.body.clone(),
            timeout: self.config.timeout,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> LucidchartResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        LucidchartError::Response(ResponseError::DeserializationError(format!(
            "Failed to deserialize response: {}",
            e
        )))
    })
}

/// Maps a non-2xx response to a domain error.
fn handle_error_response(response: &HttpResponse) -> LucidchartError {
    let status = response.status;

    let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
        .ok()
        .and_then(|e| match (e.code, e.message) {
            (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        })
        .unwrap_or_else(|| {
            format!(
                "HTTP {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&response.body)
            )
        });

    let retry_after = response
        .headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    match status {
        StatusCode::BAD_REQUEST => LucidchartError::Request(RequestError::BadRequest(message)),
        StatusCode::UNAUTHORIZED => {
            LucidchartError::Authentication(AuthenticationError::InvalidToken(message))
        }
        StatusCode::FORBIDDEN => LucidchartError::Authorization(AuthorizationError::Forbidden(message)),
        StatusCode::NOT_FOUND => LucidchartError::Resource(ResourceError::NotFound(message)),
        StatusCode::CONFLICT => LucidchartError::Resource(ResourceError::Conflict(message)),
        StatusCode::TOO_MANY_REQUESTS => {
            LucidchartError::Quota(QuotaError::RateLimited { message, retry_after })
        }
        StatusCode::BAD_GATEWAY => LucidchartError::Server(ServerError::BadGateway(message)),
        StatusCode::SERVICE_UNAVAILABLE => {
            LucidchartError::Server(ServerError::ServiceUnavailable { message, retry_after })
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            LucidchartError::Server(ServerError::InternalError(message))
        }
        _ => LucidchartError::Server(ServerError::InternalError(format!(
            "HTTP {}: {}",
            status.as_u16(),
            message
        ))),
    }
}
