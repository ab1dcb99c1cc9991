//! Caselaw library crate (used by the CLI and integration tests).
//!
//! # Public API Surface
//!
//! ## Client
//! - [`CaseLawClient`], [`Config`], [`ConfigError`] - Search client and its configuration
//! - [`SearchRequest`], [`SearchMode`], [`StatusFilter`] - Request building
//! - [`SearchPage`], [`SearchResult`], [`Cursor`] - Normalized responses and pagination
//! - [`AggregatedResults`], [`ResultPager`] - Multi-page traversal
//!
//! ## Failures
//! - [`ApiError`], [`ErrorKind`] - Error taxonomy shared by every network call
//! - [`RetryPolicy`], [`Backoff`] - Per-kind retry table
//!
//! ## Documents
//! - [`OpinionText`], [`ClusterDetails`], [`FullTextOutcome`] - Resource lookups
//!
//! ## Fusion
//! - [`FusionSearcher`], [`FusedResults`] - Keyword + semantic dual search
//! - [`Reranker`], [`CohereReranker`] - Relevance oracle
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod api;
pub mod config;
pub mod constants;
pub mod courts;
pub mod documents;
pub mod fusion;
pub mod rerank;
pub mod search;

pub use api::{ApiError, Backoff, ErrorKind, RetryPolicy, Transport, TransportError};
pub use config::{Config, ConfigError};
pub use courts::{CourtFilter, CourtResolver, DirectCourtCodes};
pub use documents::{ClusterDetails, FullText, FullTextOutcome, OpinionText, TextField};
pub use fusion::{FusedResult, FusedResults, FusionConfig, FusionSearcher, ResultSource};
pub use rerank::{CohereReranker, RankedDocument, Reranker, RerankerConfig, RerankerError};
pub use search::{
    AggregatedResults, CaseLawClient, Cursor, ResultPager, SearchMode, SearchPage, SearchRequest,
    SearchResult, StatusFilter,
};
