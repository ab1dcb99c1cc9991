use thiserror::Error;

/// Errors raised by a reranking oracle.
#[derive(Debug, Error)]
pub enum RerankerError {
    #[error("reranker not available: {reason}")]
    NotAvailable { reason: String },

    #[error("invalid reranker configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("rerank request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("rerank API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid rerank response: {reason}")]
    InvalidResponse { reason: String },
}

impl From<reqwest::Error> for RerankerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RerankerError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            RerankerError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}
