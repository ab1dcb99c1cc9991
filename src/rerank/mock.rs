use std::sync::Mutex;

use async_trait::async_trait;

use super::{RankedDocument, Reranker, RerankerError, normalize_ranking};

type FailWhen = Box<dyn Fn(&str, &[String]) -> bool + Send + Sync>;

/// Recorded arguments of one [`Reranker::rerank`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankCall {
    pub query: String,
    pub documents: Vec<String>,
    pub top_n: usize,
}

/// Deterministic reranker: ranks the submitted list in reverse, scoring
/// `0.9, 0.8, ...`.
pub struct MockReranker {
    available: bool,
    fail_when: Option<FailWhen>,
    calls: Mutex<Vec<RerankCall>>,
}

impl Default for MockReranker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReranker {
    pub fn new() -> Self {
        Self {
            available: true,
            fail_when: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reports itself unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Available, but every call fails.
    pub fn failing() -> Self {
        Self::failing_when(|_, _| true)
    }

    /// Available; calls for which `predicate(query, documents)` holds fail.
    pub fn failing_when<F>(predicate: F) -> Self
    where
        F: Fn(&str, &[String]) -> bool + Send + Sync + 'static,
    {
        Self {
            fail_when: Some(Box::new(predicate)),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<RerankCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Reranker for MockReranker {
    fn id(&self) -> &str {
        "mock"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>, RerankerError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RerankCall {
                query: query.to_string(),
                documents: documents.to_vec(),
                top_n,
            });
        }

        if !self.available {
            return Err(RerankerError::NotAvailable {
                reason: "mock reranker disabled".to_string(),
            });
        }
        if self
            .fail_when
            .as_ref()
            .is_some_and(|predicate| predicate(query, documents))
        {
            return Err(RerankerError::RequestFailed {
                reason: "mock reranker failure".to_string(),
            });
        }

        let ranked = (0..documents.len())
            .rev()
            .enumerate()
            .map(|(rank, index)| RankedDocument {
                index,
                relevance_score: 0.9 - rank as f64 * 0.1,
            })
            .collect();
        normalize_ranking(ranked, documents.len(), top_n)
    }
}
