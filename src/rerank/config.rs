use std::time::Duration;

pub const DEFAULT_RERANK_MODEL: &str = "rerank-v4.0-fast";

pub const DEFAULT_RERANK_URL: &str = "https://api.cohere.com/v2/rerank";

pub const DEFAULT_RERANK_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct RerankerConfig {
    /// `None` puts the reranker in stub mode.
    pub api_key: Option<String>,

    pub model: String,

    pub endpoint: String,

    pub timeout: Duration,
}

impl std::fmt::Debug for RerankerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RerankerConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_RERANK_MODEL.to_string(),
            endpoint: DEFAULT_RERANK_URL.to_string(),
            timeout: DEFAULT_RERANK_TIMEOUT,
        }
    }
}

impl RerankerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }

        if let Err(e) = reqwest::Url::parse(&self.endpoint) {
            return Err(format!("invalid endpoint '{}': {}", self.endpoint, e));
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_env() -> Self {
        let api_key = std::env::var("COHERE_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let model = std::env::var("CASELAW_RERANK_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RERANK_MODEL.to_string());

        let endpoint = std::env::var("CASELAW_RERANK_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_RERANK_URL.to_string());

        let timeout = std::env::var("CASELAW_RERANK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_RERANK_TIMEOUT);

        Self {
            api_key,
            model,
            endpoint,
            timeout,
        }
    }
}
