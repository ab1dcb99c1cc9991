//! Cross-cutting, shared constants.
//!
//! Wire-level names (parameter keys, endpoint paths) live next to the code that sends them;
//! this module only holds values that several modules must agree on.

use std::time::Duration;

/// Default REST API root (v4).
pub const DEFAULT_API_BASE: &str = "https://www.courtlistener.com/api/rest/v4";

/// Site origin used to turn `absolute_url` paths into browsable links.
pub const SITE_ORIGIN: &str = "https://www.courtlistener.com";

/// Attempts per logical call (first try included).
pub const MAX_ATTEMPTS: u32 = 3;

/// Multiplier of the exponential backoff schedules.
pub const RETRY_BACKOFF_FACTOR: u32 = 2;

/// Wait used when a 429 carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Unit of the 5xx backoff (`factor^attempt * 5s`).
pub const SERVER_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Unit of the connection-failure backoff (`factor^attempt * 2s`).
pub const CONNECT_ERROR_BACKOFF: Duration = Duration::from_secs(2);

/// Per-request timeout for search and metadata lookups.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Full opinion bodies are large; they get a longer timeout.
pub const DEFAULT_FULL_TEXT_TIMEOUT: Duration = Duration::from_secs(60);

/// Smallest page size the search endpoint accepts.
pub const MIN_PAGE_SIZE: u32 = 1;

/// Largest page size the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 20;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page size of the lazy traversal.
pub const PAGER_PAGE_SIZE: u32 = MAX_PAGE_SIZE;

/// Results kept per side when fusing keyword and semantic hits.
pub const DEFAULT_FUSION_PER_SIDE: usize = 5;

/// Raw candidates fetched per side before reranking.
pub const DEFAULT_FUSION_CANDIDATES: u32 = 10;

/// Characters of the query echoed into log lines.
pub const LOG_QUERY_CHARS: usize = 80;

/// Returns at most `max_chars` characters of `text` (never splits a code point).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
