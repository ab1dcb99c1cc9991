//! Dual-source fusion of keyword and semantic search results.

pub mod searcher;
pub mod types;


pub use searcher::FusionSearcher;
pub use types::{FusedResult, FusedResults, FusionConfig, ResultSource};
