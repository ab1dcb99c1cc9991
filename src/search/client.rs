use std::borrow::Cow;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::model::{RawSearchPage, SearchPage};
use super::request::{QueryParams, SearchRequest};
use crate::api::{
    ApiError, AuthHeaders, EndpointFamily, ErrorKind, HttpRequest, ReqwestTransport, RetryPolicy,
    Transport, get_json,
};
use crate::config::{Config, ConfigError};
use crate::constants::{LOG_QUERY_CHARS, truncate_chars};

const SEARCH_PATH: &str = "search/";

/// Case-law API client.
///
/// Holds only the configuration, the precomputed credential headers and the
/// transport, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct CaseLawClient<T = ReqwestTransport> {
    config: Config,
    auth: AuthHeaders,
    retry: RetryPolicy,
    transport: T,
}

impl CaseLawClient<ReqwestTransport> {
    /// Creates a client over HTTP. Fails before any network activity when the
    /// credential is missing.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = ReqwestTransport::new()?;
        Self::with_transport(config, transport)
    }

    /// [`Config::from_env`] followed by [`CaseLawClient::new`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(Config::from_env()?)
    }
}

impl<T: Transport> CaseLawClient<T> {
    /// Creates a client over an arbitrary transport.
    pub fn with_transport(config: Config, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let token = config.token().ok_or(ConfigError::MissingEnvVar {
            name: "COURTLISTENER_API_KEY",
        })?;
        let auth = AuthHeaders::new(token)?;
        let retry = RetryPolicy::with_max_attempts(config.max_attempts);

        Ok(Self {
            config,
            auth,
            retry,
            transport,
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Runs one search and normalizes the page.
    ///
    /// Input errors are raised before any request is sent.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchPage, ApiError> {
        request.validate()?;

        let effective_query = request.effective_query();
        let params = request.to_params();
        debug!(
            mode = %request.mode,
            params = params.len(),
            has_cursor = request.cursor.is_some(),
            "Built search parameters"
        );

        let http = self.http_request(
            SEARCH_PATH,
            params,
            EndpointFamily::Search,
            self.config.request_timeout,
        );
        let api_url = http.full_url();

        let policy = if request.retry_on_rate_limit {
            Cow::Borrowed(&self.retry)
        } else {
            Cow::Owned(self.retry.clone().without(ErrorKind::RateLimited))
        };

        let query_preview = truncate_chars(&effective_query, LOG_QUERY_CHARS);
        let max_attempts = policy.max_attempts();
        let mut attempt = 0u32;

        let raw: RawSearchPage = policy
            .run("search", || {
                attempt += 1;
                info!(
                    attempt,
                    max_attempts,
                    mode = %request.mode,
                    query = query_preview,
                    "Searching case law"
                );
                get_json(&self.transport, &http)
            })
            .await?;

        let page = SearchPage::from_raw(raw, request.mode, &request.query, api_url);
        info!(
            count = page.count,
            returned = page.results_returned(),
            has_more = page.has_more(),
            "Search completed"
        );
        Ok(page)
    }

    /// Fetches the page after `previous`, reusing `request` with the cursor
    /// replaced. `Ok(None)` when `previous` was the last page.
    pub async fn get_next_page(
        &self,
        previous: &SearchPage,
        request: &SearchRequest,
    ) -> Result<Option<SearchPage>, ApiError> {
        let Some(cursor) = previous.next_cursor() else {
            return Ok(None);
        };

        let next = request.clone().cursor(cursor.clone());
        self.search(&next).await.map(Some)
    }

    /// GET on a resource endpoint (`Token`-prefixed credential), through the
    /// retry policy.
    pub(crate) async fn get_resource<R: DeserializeOwned>(
        &self,
        label: &str,
        path: &str,
        params: QueryParams,
        timeout: Duration,
    ) -> Result<R, ApiError> {
        let http = self.http_request(path, params, EndpointFamily::Resource, timeout);
        self.retry
            .run(label, || get_json(&self.transport, &http))
            .await
    }

    fn http_request(
        &self,
        path: &str,
        query: QueryParams,
        family: EndpointFamily,
        timeout: Duration,
    ) -> HttpRequest {
        HttpRequest {
            url: self.config.endpoint(path),
            query,
            headers: self.auth.for_family(family).clone(),
            timeout,
        }
    }
}
