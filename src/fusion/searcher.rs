use std::sync::Arc;

use tracing::{debug, info, warn};

use super::types::{FusedResult, FusedResults, FusionConfig, ResultSource};
use crate::api::{ApiError, Transport};
use crate::rerank::{Reranker, compose_rerank_text};
use crate::search::{CaseLawClient, SearchMode, SearchRequest, SearchResult};

/// Runs a keyword and a semantic search side by side and keeps the best
/// `per_side` hits of each.
///
/// Reranking is optional: without an available reranker, or when it fails,
/// a side keeps its first `per_side` hits in API order.
pub struct FusionSearcher<'a, T> {
    client: &'a CaseLawClient<T>,
    reranker: Option<Arc<dyn Reranker>>,
}

impl<T> std::fmt::Debug for FusionSearcher<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FusionSearcher")
            .field("reranker", &self.reranker.as_ref().map(|r| r.id().to_string()))
            .finish()
    }
}

impl<'a, T: Transport> FusionSearcher<'a, T> {
    pub fn new(client: &'a CaseLawClient<T>, reranker: Option<Arc<dyn Reranker>>) -> Self {
        Self { client, reranker }
    }

    pub fn reranker_available(&self) -> bool {
        self.reranker.as_ref().is_some_and(|r| r.is_available())
    }

    /// Searches both modes concurrently and concatenates the kept keyword hits
    /// with the kept semantic hits.
    ///
    /// The request's mode and cursor are ignored. Search failures on either
    /// side are returned; reranker failures are not.
    pub async fn dual_search(
        &self,
        request: &SearchRequest,
        config: FusionConfig,
    ) -> Result<FusedResults, ApiError> {
        let keyword_request = side_request(request, SearchMode::Keyword, config);
        let semantic_request = side_request(request, SearchMode::Semantic, config);

        info!(
            per_side = config.per_side,
            candidates = config.candidates_per_side,
            reranker = self.reranker_available(),
            "Starting dual search"
        );

        let (keyword, semantic) = tokio::join!(
            self.client.search(&keyword_request),
            self.client.search(&semantic_request)
        );
        let keyword = keyword?;
        let semantic = semantic?;

        let keyword_total = keyword.count;
        let semantic_total = semantic.count;

        let mut results = self
            .select(&request.query, ResultSource::Keyword, keyword.results, config.per_side)
            .await;
        results.extend(
            self.select(&request.query, ResultSource::Semantic, semantic.results, config.per_side)
                .await,
        );

        info!(
            returned = results.len(),
            keyword_total, semantic_total, "Dual search completed"
        );

        Ok(FusedResults {
            query: request.query.clone(),
            results,
            keyword_total,
            semantic_total,
        })
    }

    async fn select(
        &self,
        query: &str,
        source: ResultSource,
        candidates: Vec<SearchResult>,
        per_side: usize,
    ) -> Vec<FusedResult> {
        let reranker = match &self.reranker {
            Some(reranker) if reranker.is_available() && candidates.len() > per_side => reranker,
            _ => {
                debug!(
                    %source,
                    candidates = candidates.len(),
                    per_side,
                    "Keeping candidates in API order"
                );
                return first_n(candidates, source, per_side);
            }
        };

        let documents: Vec<String> = candidates.iter().map(compose_rerank_text).collect();

        match reranker.rerank(query, &documents, per_side).await {
            Ok(ranked) => {
                let mut slots: Vec<Option<SearchResult>> = candidates.into_iter().map(Some).collect();
                let kept: Vec<FusedResult> = ranked
                    .into_iter()
                    .filter_map(|r| {
                        slots.get_mut(r.index)?.take().map(|result| FusedResult {
                            result,
                            source,
                            rerank_score: Some(r.relevance_score),
                        })
                    })
                    .collect();
                info!(
                    %source,
                    reranker = reranker.id(),
                    kept = kept.len(),
                    "Reranked candidates"
                );
                kept
            }
            Err(e) => {
                warn!(
                    %source,
                    reranker = reranker.id(),
                    error = %e,
                    "Reranking failed, keeping candidates in API order"
                );
                first_n(candidates, source, per_side)
            }
        }
    }
}

fn side_request(request: &SearchRequest, mode: SearchMode, config: FusionConfig) -> SearchRequest {
    let mut side = request.clone().mode(mode).page_size(config.candidates_per_side);
    side.cursor = None;
    side
}

fn first_n(candidates: Vec<SearchResult>, source: ResultSource, n: usize) -> Vec<FusedResult> {
    candidates
        .into_iter()
        .take(n)
        .map(|result| FusedResult::unranked(result, source))
        .collect()
}
