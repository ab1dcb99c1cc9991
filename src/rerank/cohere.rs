use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::RerankerConfig;
use super::error::RerankerError;
use super::{RankedDocument, Reranker, normalize_ranking};

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RankedDocument>,
}

/// Cohere rerank API client.
///
/// Without an API key it loads in stub mode: [`Reranker::is_available`] is
/// `false` and every call fails with [`RerankerError::NotAvailable`].
pub struct CohereReranker {
    config: RerankerConfig,
    http: Option<reqwest::Client>,
}

impl std::fmt::Debug for CohereReranker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereReranker")
            .field("config", &self.config)
            .field("available", &self.http.is_some())
            .finish()
    }
}

impl CohereReranker {
    pub fn load(config: RerankerConfig) -> Result<Self, RerankerError> {
        if let Err(reason) = config.validate() {
            return Err(RerankerError::InvalidConfig { reason });
        }

        if config.api_key.is_none() {
            info!("No COHERE_API_KEY configured, reranker operating in stub mode");
            return Ok(Self { config, http: None });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RerankerError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        info!(model = %config.model, "Initialized reranker");
        Ok(Self {
            config,
            http: Some(http),
        })
    }

    pub fn from_env() -> Result<Self, RerankerError> {
        Self::load(RerankerConfig::from_env())
    }

    /// Like [`CohereReranker::load`], but a config that cannot be loaded is
    /// logged and yields an unavailable reranker instead of an error.
    pub fn load_or_stub(config: RerankerConfig) -> Self {
        match Self::load(config) {
            Ok(reranker) => reranker,
            Err(e) => {
                warn!(error = %e, "Reranker unavailable, continuing without reranking");
                Self::stub()
            }
        }
    }

    pub fn from_env_or_stub() -> Self {
        Self::load_or_stub(RerankerConfig::from_env())
    }

    pub fn stub() -> Self {
        Self {
            config: RerankerConfig::stub(),
            http: None,
        }
    }

    pub fn config(&self) -> &RerankerConfig {
        &self.config
    }
}

#[async_trait]
impl Reranker for CohereReranker {
    fn id(&self) -> &str {
        &self.config.model
    }

    fn is_available(&self) -> bool {
        self.http.is_some() && self.config.api_key.is_some()
    }

    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedDocument>, RerankerError> {
        let (Some(http), Some(api_key)) = (&self.http, &self.config.api_key) else {
            return Err(RerankerError::NotAvailable {
                reason: "no API key configured".to_string(),
            });
        };

        if documents.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let top_n = top_n.min(documents.len());
        debug!(
            model = %self.config.model,
            documents = documents.len(),
            top_n,
            "Sending rerank request"
        );

        let response = http
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&RerankRequest {
                model: &self.config.model,
                query,
                documents,
                top_n,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Rerank API returned an error");
            return Err(RerankerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: RerankResponse = response.json().await?;
        normalize_ranking(parsed.results, documents.len(), top_n)
    }
}
