use std::time::Duration;

use thiserror::Error;

/// Transport-level failure class of a [`ApiError::Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkFailure {
    /// The request did not complete within its timeout.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// Any other transport failure (TLS, body read, redirect loop, ...).
    Other,
}

#[derive(Debug, Error)]
/// Errors surfaced by search and document calls.
pub enum ApiError {
    /// 401/403: the credential is missing, invalid, or lacks permission.
    #[error("authentication failed: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// 429: the API asked us to slow down.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Server-provided wait, when one was usable.
        retry_after: Option<Duration>,
    },

    /// 400 or client-side validation failure.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Error message.
        message: String,
        /// Offending request field, when known.
        field: Option<String>,
        /// Parsed error body, when the server sent one.
        details: Option<serde_json::Value>,
    },

    /// 404: the resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// 5xx: the server failed.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("network error: {message}")]
    Network {
        /// Failure class (drives the retry policy).
        failure: NetworkFailure,
        /// Error message.
        message: String,
    },

    /// A 200 response whose body was not the expected JSON.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// Any other status.
    #[error("API error ({status}): {message}")]
    Generic {
        /// HTTP status (0 when no response was involved).
        status: u16,
        /// Error message.
        message: String,
    },
}

/// Flat projection of [`ApiError`] used as the retry-policy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    RateLimited,
    InvalidQuery,
    NotFound,
    ServerError,
    Timeout,
    ConnectionFailed,
    Transport,
    Decode,
    Generic,
}

impl ErrorKind {
    /// Returns `true` for kinds the default retry policy retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited
                | ErrorKind::ServerError
                | ErrorKind::Timeout
                | ErrorKind::ConnectionFailed
        )
    }
}

impl ApiError {
    /// Client-side validation failure for `field`.
    pub fn invalid_query(message: impl Into<String>, field: &str) -> Self {
        ApiError::InvalidQuery {
            message: message.into(),
            field: Some(field.to_string()),
            details: None,
        }
    }

    /// Returns the policy key for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Authentication { .. } => ErrorKind::Authentication,
            ApiError::RateLimited { .. } => ErrorKind::RateLimited,
            ApiError::InvalidQuery { .. } => ErrorKind::InvalidQuery,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Server { .. } => ErrorKind::ServerError,
            ApiError::Network { failure, .. } => match failure {
                NetworkFailure::Timeout => ErrorKind::Timeout,
                NetworkFailure::Connect => ErrorKind::ConnectionFailed,
                NetworkFailure::Other => ErrorKind::Transport,
            },
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::Generic { .. } => ErrorKind::Generic,
        }
    }

    /// Returns the offending field of an [`ApiError::InvalidQuery`].
    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::InvalidQuery { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Returns the server-requested wait of an [`ApiError::RateLimited`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ApiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Failure of the HTTP layer before a status code was available.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("transport failure: {message}")]
    Other { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = e.to_string();
        if e.is_timeout() {
            TransportError::Timeout { message }
        } else if e.is_connect() {
            TransportError::Connect { message }
        } else {
            TransportError::Other { message }
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        let failure = match &e {
            TransportError::Timeout { .. } => NetworkFailure::Timeout,
            TransportError::Connect { .. } => NetworkFailure::Connect,
            TransportError::Other { .. } => NetworkFailure::Other,
        };
        ApiError::Network {
            failure,
            message: e.to_string(),
        }
    }
}
