use std::future::Future;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap};

use super::error::TransportError;
use crate::config::ConfigError;

/// One outgoing GET request, fully resolved.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Absolute endpoint URL (no query string).
    pub url: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(&'static str, String)>,
    /// Credential and content headers for the endpoint family.
    pub headers: HeaderMap,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Returns the value of query parameter `key`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if query parameter `key` is present.
    pub fn has_param(&self, key: &str) -> bool {
        self.param(key).is_some()
    }

    /// Returns the `Authorization` header as text.
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
    }

    /// Fully encoded URL, for display and debugging.
    pub fn full_url(&self) -> String {
        reqwest::Url::parse_with_params(&self.url, &self.query)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| self.url.clone())
    }
}

/// A response whose status line and body were received.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    /// Response with no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// HTTP seam used by the search client and the document fetchers.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever response came back, success or not.
    fn get(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

#[derive(Debug, Clone)]
/// [`Transport`] backed by a pooled `reqwest` client.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the underlying HTTP client.
    pub fn new() -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("caselaw-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;
        Ok(Self { http })
    }

    /// Wraps an existing client.
    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .http
            .get(&request.url)
            .query(&request.query)
            .headers(request.headers.clone())
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
