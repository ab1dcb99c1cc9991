//! Relevance reranking oracle.
//!
//! The oracle is optional and fallible; callers decide how to degrade.

pub mod cohere;
pub mod config;
pub mod document;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use cohere::CohereReranker;
pub use config::{DEFAULT_RERANK_MODEL, DEFAULT_RERANK_URL, RerankerConfig};
pub use document::compose_rerank_text;
pub use error::RerankerError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockReranker, RerankCall};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of a ranking: position in the submitted list plus its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub index: usize,
    pub relevance_score: f64,
}

#[async_trait]
/// Scores documents against a query.
pub trait Reranker: Send + Sync {
    /// Model or backend identifier, for logs.
    fn id(&self) -> &str;

    /// `false` when the oracle is not configured; callers skip it entirely.
    fn is_available(&self) -> bool;

    /// Returns at most `top_n` entries, best first.
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>, RerankerError>;
}

/// Checks indices against `len`, orders best first and keeps `top_n`.
pub(crate) fn normalize_ranking(
    mut ranked: Vec<RankedDocument>,
    len: usize,
    top_n: usize,
) -> Result<Vec<RankedDocument>, RerankerError> {
    if let Some(bad) = ranked.iter().find(|r| r.index >= len) {
        return Err(RerankerError::InvalidResponse {
            reason: format!("index {} out of range for {} documents", bad.index, len),
        });
    }

    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);
    Ok(ranked)
}
