//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set (or was blank).
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// A numeric setting could not be parsed or is out of range.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The API root is not a valid absolute URL.
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    /// The credential contains bytes that cannot go into an HTTP header.
    #[error("API credential is not a valid header value")]
    InvalidCredential,

    /// The HTTP client could not be built (TLS backend initialisation).
    #[error("failed to build HTTP client: {message}")]
    HttpClient { message: String },
}
