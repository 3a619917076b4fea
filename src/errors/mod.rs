//! Error types for the Lucidchart integration.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Result type for Lucidchart operations.
pub type LucidchartResult<T> = Result<T, LucidchartError>;

/// Top-level error type for the Lucidchart integration.
#[derive(Debug, Error)]
pub enum LucidchartError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// The token endpoint rejected the request.
    #[error("Upstream validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Pagination cursor could not be extracted.
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),

    /// Authorization error.
    #[error("Authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Resource error.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Quota error.
    #[error("Quota error: {0}")]
    Quota(#[from] QuotaError),

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Server error.
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Response error.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl LucidchartError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        LucidchartError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        LucidchartError::Request(RequestError::InvalidArgument(msg.into()))
    }

    /// Creates a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        LucidchartError::Resource(ResourceError::NotFound(msg.into()))
    }

    /// Creates a deserialization error.
    pub fn deserialization(msg: impl Into<String>) -> Self {
        LucidchartError::Response(ResponseError::DeserializationError(msg.into()))
    }

    /// Returns true if upstream reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LucidchartError::Resource(ResourceError::NotFound(_)))
    }

    /// Returns true if upstream rejected the bearer credential.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            LucidchartError::Authentication(
                AuthenticationError::InvalidToken(_)
                    | AuthenticationError::RejectedRefreshFailed { .. }
            )
        )
    }

    /// Returns true if the error is an invalid argument supplied by the caller.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, LucidchartError::Request(RequestError::InvalidArgument(_)))
    }

    /// Returns the retry delay hint if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LucidchartError::Quota(QuotaError::RateLimited { retry_after, .. }) => *retry_after,
            LucidchartError::Server(ServerError::ServiceUnavailable { retry_after, .. }) => {
                *retry_after
            }
            _ => None,
        }
    }

    /// Returns the HTTP status code if applicable.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            LucidchartError::Authentication(AuthenticationError::InvalidToken(_)) => {
                Some(StatusCode::UNAUTHORIZED)
            }
            LucidchartError::Authentication(AuthenticationError::RejectedRefreshFailed {
                status,
                ..
            }) => StatusCode::from_u16(*status).ok(),
            LucidchartError::Validation(e) => StatusCode::from_u16(e.status).ok(),
            LucidchartError::Authorization(_) => Some(StatusCode::FORBIDDEN),
            LucidchartError::Request(RequestError::BadRequest(_)) => Some(StatusCode::BAD_REQUEST),
            LucidchartError::Resource(ResourceError::NotFound(_)) => Some(StatusCode::NOT_FOUND),
            LucidchartError::Resource(ResourceError::Conflict(_)) => Some(StatusCode::CONFLICT),
            LucidchartError::Quota(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            LucidchartError::Server(ServerError::InternalError(_)) => {
                Some(StatusCode::INTERNAL_SERVER_ERROR)
            }
            LucidchartError::Server(ServerError::ServiceUnavailable { .. }) => {
                Some(StatusCode::SERVICE_UNAVAILABLE)
            }
            LucidchartError::Server(ServerError::BadGateway(_)) => Some(StatusCode::BAD_GATEWAY),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing credentials.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Neither a held refresh token nor a supplied one is available.
    #[error("No refresh token available: {0}")]
    NoRefreshMaterial(String),

    /// Bearer credential rejected by upstream.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token exchange failed.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// A request was rejected and the refresh it triggered failed too.
    #[error("Request rejected with HTTP {status}; token refresh failed: {source}")]
    RejectedRefreshFailed {
        /// Status of the rejected request.
        status: u16,
        /// The refresh failure.
        #[source]
        source: Box<LucidchartError>,
    },
}

/// A 400-class rejection from the OAuth2 token endpoint.
#[derive(Debug, Error)]
#[error("{description} ({transport})")]
pub struct ValidationError {
    /// HTTP status returned by the token endpoint.
    pub status: u16,
    /// Upstream error code, e.g. `invalid_grant`.
    pub error: String,
    /// Human-readable upstream description.
    pub description: String,
    /// The transport-level failure the description is joined with.
    pub transport: String,
}

/// Pagination errors.
#[derive(Debug, Error)]
pub enum PaginationError {
    /// The `Link` header did not have a `<url>; rel=...` shape.
    #[error("Malformed Link header: {0}")]
    MalformedLinkHeader(String),

    /// The URL embedded in the `Link` header could not be parsed.
    #[error("Invalid URL in Link header {link:?}: {source}")]
    InvalidLinkUrl {
        /// The offending header value.
        link: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// Forbidden.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Request errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Caller supplied an unusable argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream rejected the request.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Resource errors.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict.
    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Quota errors.
#[derive(Debug, Error)]
pub enum QuotaError {
    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration.
        retry_after: Option<Duration>,
    },
}

/// Network errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Timeout.
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Internal error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Service unavailable.
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Error message.
        message: String,
        /// Retry after duration.
        retry_after: Option<Duration>,
    },

    /// Bad gateway.
    #[error("Bad gateway: {0}")]
    BadGateway(String),
}

/// Response errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Unexpected format.
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl From<TransportError> for LucidchartError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout(msg) => LucidchartError::Network(NetworkError::Timeout(msg)),
            TransportError::Network(msg) | TransportError::Http(msg) => {
                LucidchartError::Network(NetworkError::ConnectionFailed(msg))
            }
        }
    }
}
