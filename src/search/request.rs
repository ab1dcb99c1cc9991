//! Search request surface and query-parameter construction.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cursor::Cursor;
use crate::api::ApiError;
use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};

/// Ordered query parameters as sent on the wire.
pub type QueryParams = Vec<(&'static str, String)>;

/// Result type selector for case-law opinions.
const OPINION_TYPE: &str = "o";

const DEFAULT_ORDER_BY: &str = "score desc";
const WIRE_DATE_FORMAT: &str = "%m/%d/%Y";
const INPUT_DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Retrieval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Lexical search over the full-text index.
    Keyword,
    /// Embedding-based search.
    Semantic,
    /// Both of the above, fused; only meaningful for
    /// [`FusionSearcher`](crate::fusion::FusionSearcher).
    Both,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Semantic => "semantic",
            SearchMode::Both => "both",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(SearchMode::Keyword),
            "semantic" => Ok(SearchMode::Semantic),
            "both" => Ok(SearchMode::Both),
            other => Err(ApiError::invalid_query(
                format!("invalid search_type '{other}', expected keyword, semantic or both"),
                "search_type",
            )),
        }
    }
}

/// Precedential-status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Published,
    Unpublished,
    All,
}

impl StatusFilter {
    /// Parses `published`, `unpublished` or `all`; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "published" => Some(StatusFilter::Published),
            "unpublished" => Some(StatusFilter::Unpublished),
            "all" => Some(StatusFilter::All),
            _ => None,
        }
    }

    /// `stat_*` keys this filter switches on.
    pub fn flags(&self) -> &'static [&'static str] {
        match self {
            StatusFilter::Published => &["stat_Published"],
            StatusFilter::Unpublished => &["stat_Unpublished"],
            StatusFilter::All => &["stat_Published", "stat_Unpublished"],
        }
    }
}

/// Parses a filing-date bound given as `MM/DD/YYYY` or `YYYY-MM-DD`.
///
/// Blank input means "no bound".
pub fn parse_filed_date(text: &str, field: &str) -> Result<Option<NaiveDate>, ApiError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(Some)
        .ok_or_else(|| {
            ApiError::invalid_query(
                format!("invalid date '{text}', expected MM/DD/YYYY or YYYY-MM-DD"),
                field,
            )
        })
}

/// Folds citation-count bounds into the query text, lower bound first.
pub fn fold_citation_bounds(query: &str, cited_gt: Option<u64>, cited_lt: Option<u64>) -> String {
    let mut effective = query.to_string();
    if let Some(gt) = cited_gt {
        effective = format!("({effective}) AND citeCount:[{gt} TO *]");
    }
    if let Some(lt) = cited_lt {
        effective = format!("({effective}) AND citeCount:[* TO {lt}]");
    }
    effective
}

/// Clamps a requested page size into the range the endpoint accepts.
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

/// One search call's inputs.
///
/// Built with [`SearchRequest::new`] plus the chained setters:
///
/// ```
/// use caselaw::search::{SearchMode, SearchRequest, StatusFilter};
///
/// let request = SearchRequest::new("qualified immunity", SearchMode::Keyword)
///     .court("scotus ca9")
///     .status(StatusFilter::All)
///     .cited_gt(10)
///     .page_size(20);
/// assert_eq!(request.effective_query(), "(qualified immunity) AND citeCount:[10 TO *]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub mode: SearchMode,
    /// Space-joined court ids; blank means all courts.
    pub court: String,
    pub filed_after: Option<NaiveDate>,
    pub filed_before: Option<NaiveDate>,
    /// `None` sends no `stat_*` flag at all.
    pub status: Option<StatusFilter>,
    pub order_by: String,
    /// Keyword mode only.
    pub cited_gt: Option<u64>,
    /// Keyword mode only.
    pub cited_lt: Option<u64>,
    /// Clamped into `[1, 20]` when sent. `None`: 10 for a single search,
    /// 20 per page when accumulating.
    pub page_size: Option<u32>,
    pub cursor: Option<Cursor>,
    pub highlight: bool,
    /// When `false`, a 429 is surfaced instead of waited out.
    pub retry_on_rate_limit: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, mode: SearchMode) -> Self {
        Self {
            query: query.into(),
            mode,
            court: String::new(),
            filed_after: None,
            filed_before: None,
            status: Some(StatusFilter::Published),
            order_by: DEFAULT_ORDER_BY.to_string(),
            cited_gt: None,
            cited_lt: None,
            page_size: None,
            cursor: None,
            highlight: true,
            retry_on_rate_limit: true,
        }
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn court(mut self, court: impl Into<String>) -> Self {
        self.court = court.into();
        self
    }

    pub fn filed_after(mut self, date: NaiveDate) -> Self {
        self.filed_after = Some(date);
        self
    }

    pub fn filed_before(mut self, date: NaiveDate) -> Self {
        self.filed_before = Some(date);
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// Sends no status flag; the API applies its own default.
    pub fn any_status(mut self) -> Self {
        self.status = None;
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    pub fn cited_gt(mut self, min: u64) -> Self {
        self.cited_gt = Some(min);
        self
    }

    pub fn cited_lt(mut self, max: u64) -> Self {
        self.cited_lt = Some(max);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn retry_on_rate_limit(mut self, retry: bool) -> Self {
        self.retry_on_rate_limit = retry;
        self
    }

    /// Rejects blank queries and modes a single search cannot serve.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.query.trim().is_empty() {
            return Err(ApiError::invalid_query("query cannot be empty", "query"));
        }
        if self.mode == SearchMode::Both {
            return Err(ApiError::invalid_query(
                "invalid search_type 'both' for a single search, expected keyword or semantic",
                "search_type",
            ));
        }
        Ok(())
    }

    /// Query text actually sent.
    ///
    /// Citation bounds are folded in for keyword mode only; semantic search
    /// ignores them.
    pub fn effective_query(&self) -> String {
        match self.mode {
            SearchMode::Keyword => fold_citation_bounds(&self.query, self.cited_gt, self.cited_lt),
            SearchMode::Semantic | SearchMode::Both => self.query.clone(),
        }
    }

    /// Builds the wire parameters. Filters that are not applied are absent,
    /// never present with an empty value.
    pub fn to_params(&self) -> QueryParams {
        let mut params: QueryParams = vec![
            ("q", self.effective_query()),
            ("type", OPINION_TYPE.to_string()),
            (
                "page_size",
                clamp_page_size(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)).to_string(),
            ),
            ("order_by", self.order_by.clone()),
        ];

        if self.mode == SearchMode::Semantic {
            params.push(("semantic", "true".to_string()));
        }
        if self.highlight {
            params.push(("highlight", "on".to_string()));
        }

        let court = self.court.trim();
        if !court.is_empty() {
            params.push(("court", court.to_string()));
        }
        if let Some(date) = self.filed_after {
            params.push(("filed_after", date.format(WIRE_DATE_FORMAT).to_string()));
        }
        if let Some(date) = self.filed_before {
            params.push(("filed_before", date.format(WIRE_DATE_FORMAT).to_string()));
        }

        if let Some(status) = self.status {
            for flag in status.flags() {
                params.push((*flag, "on".to_string()));
            }
        }

        if let Some(cursor) = self.cursor.as_ref().filter(|c| !c.as_str().is_empty()) {
            params.push(("cursor", cursor.as_str().to_string()));
        }

        params
    }
}
