//! Walking the cursor chain: bounded accumulation and lazy traversal.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream};
use serde::Serialize;
use tracing::{debug, info};

use super::client::CaseLawClient;
use super::cursor::Cursor;
use super::model::SearchResult;
use super::request::{SearchMode, SearchRequest, clamp_page_size};
use crate::api::{ApiError, Transport};
use crate::constants::{MAX_PAGE_SIZE, PAGER_PAGE_SIZE};

/// Results gathered across pages by [`CaseLawClient::search_all_pages`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResults {
    /// Total hits reported by the last page fetched.
    pub count: u64,
    pub results: Vec<SearchResult>,
    pub mode: SearchMode,
    pub query: String,
    pub max_results_requested: usize,
    /// `true` once every reported hit, or the requested maximum, was collected.
    pub all_results_fetched: bool,
}

impl AggregatedResults {
    pub fn results_returned(&self) -> usize {
        self.results.len()
    }
}

impl<T: Transport> CaseLawClient<T> {
    /// Follows next cursors until `max_results` hits are collected or the
    /// chain ends.
    ///
    /// Each page asks for `min(page_size, remaining)`, with an unset page size
    /// meaning the API maximum of 20. A failing page aborts
    /// the walk with its error; an empty page ends it.
    pub async fn search_all_pages(
        &self,
        request: &SearchRequest,
        max_results: usize,
    ) -> Result<AggregatedResults, ApiError> {
        let page_size = clamp_page_size(request.page_size.unwrap_or(MAX_PAGE_SIZE)) as usize;
        let mut results: Vec<SearchResult> = Vec::new();
        let mut cursor: Option<Cursor> = request.cursor.clone();
        let mut count = 0u64;

        while results.len() < max_results {
            let remaining = max_results - results.len();
            let current = page_size.min(remaining) as u32;

            let mut page_request = request.clone().page_size(current);
            page_request.cursor = cursor.take();

            let page = self.search(&page_request).await?;
            count = page.count;

            if page.results.is_empty() {
                debug!("Empty page, stopping");
                break;
            }
            results.extend(page.results);

            cursor = page.pagination.next_cursor;
            if cursor.is_none() {
                break;
            }

            info!(
                fetched = results.len(),
                target = (max_results as u64).min(count),
                "Fetched page"
            );
        }

        results.truncate(max_results);
        let fetched = results.len();

        Ok(AggregatedResults {
            count,
            results,
            mode: request.mode,
            query: request.query.clone(),
            max_results_requested: max_results,
            all_results_fetched: fetched as u64 >= count || fetched >= max_results,
        })
    }

    /// Lazy, one-pass traversal of every hit for `request`, 20 per page.
    pub fn iterate_results(&self, request: SearchRequest) -> ResultPager<'_, T> {
        ResultPager::new(self, request)
    }
}

/// Pull-based cursor walk.
///
/// Holds the next cursor between pulls. It ends after the last page or the
/// first error and cannot be rewound; build a new one to start over.
pub struct ResultPager<'a, T> {
    client: &'a CaseLawClient<T>,
    request: SearchRequest,
    buffer: VecDeque<SearchResult>,
    next_cursor: Option<Cursor>,
    pages_fetched: usize,
    finished: bool,
}

impl<'a, T: Transport> ResultPager<'a, T> {
    pub fn new(client: &'a CaseLawClient<T>, request: SearchRequest) -> Self {
        let next_cursor = request.cursor.clone();
        Self {
            client,
            request: request.page_size(PAGER_PAGE_SIZE),
            buffer: VecDeque::new(),
            next_cursor,
            pages_fetched: 0,
            finished: false,
        }
    }

    /// Pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.buffer.is_empty()
    }

    /// Fetches the next page. `Ok(None)` once the walk is over.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<SearchResult>>, ApiError> {
        if self.finished {
            return Ok(None);
        }

        let mut page_request = self.request.clone();
        page_request.cursor = self.next_cursor.take();

        let page = match self.client.search(&page_request).await {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };

        self.pages_fetched += 1;
        self.next_cursor = page.pagination.next_cursor;
        if self.next_cursor.is_none() || page.results.is_empty() {
            self.finished = true;
        }

        debug!(
            page = self.pages_fetched,
            returned = page.results.len(),
            finished = self.finished,
            "Pager advanced"
        );
        Ok(Some(page.results))
    }

    /// Next single hit, fetching a page when the buffer runs dry.
    pub async fn next(&mut self) -> Result<Option<SearchResult>, ApiError> {
        loop {
            if let Some(result) = self.buffer.pop_front() {
                return Ok(Some(result));
            }
            match self.next_batch().await? {
                Some(batch) => self.buffer.extend(batch),
                None => return Ok(None),
            }
        }
    }

    /// Adapts the pager into a stream. An error is yielded once and ends it.
    pub fn into_stream(self) -> impl Stream<Item = Result<SearchResult, ApiError>> + 'a {
        stream::unfold(Some(self), |state| async move {
            let mut pager = state?;
            match pager.next().await {
                Ok(Some(result)) => Some((Ok(result), Some(pager))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }
}
