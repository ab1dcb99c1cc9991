use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FUSION_CANDIDATES, DEFAULT_FUSION_PER_SIDE};
use crate::search::SearchResult;

/// Which retrieval mode produced a fused result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Keyword,
    Semantic,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search hit tagged with its source and, when reranked, its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub source: ResultSource,
    pub rerank_score: Option<f64>,
}

impl FusedResult {
    pub fn unranked(result: SearchResult, source: ResultSource) -> Self {
        Self {
            result,
            source,
            rerank_score: None,
        }
    }
}

/// Keyword-tagged results followed by semantic-tagged results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedResults {
    pub query: String,
    pub results: Vec<FusedResult>,
    /// Total hits the keyword search reported.
    pub keyword_total: u64,
    /// Total hits the semantic search reported.
    pub semantic_total: u64,
}

impl FusedResults {
    pub fn results_returned(&self) -> usize {
        self.results.len()
    }

    pub fn from_source(&self, source: ResultSource) -> impl Iterator<Item = &FusedResult> {
        self.results.iter().filter(move |r| r.source == source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusionConfig {
    /// Results kept per side.
    pub per_side: usize,
    /// Raw candidates requested per side (clamped to the API page size).
    pub candidates_per_side: u32,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            per_side: DEFAULT_FUSION_PER_SIDE,
            candidates_per_side: DEFAULT_FUSION_CANDIDATES,
        }
    }
}

impl FusionConfig {
    pub fn with_per_side(mut self, per_side: usize) -> Self {
        self.per_side = per_side;
        self
    }

    pub fn with_candidates(mut self, candidates: u32) -> Self {
        self.candidates_per_side = candidates;
        self
    }
}
