use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::SITE_ORIGIN;

/// Opaque pagination token taken from a `next`/`previous` link.
///
/// Only ever extracted from a response or replayed from a value a caller kept;
/// the client never builds or edits one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a token previously obtained from a page (e.g. persisted by a caller).
    pub fn replay(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the `cursor` query parameter of `url`.
///
/// Relative links (`/api/.../?cursor=..`, `?cursor=..`) are read against the
/// site origin. `None` for a missing or empty URL, an unparsable one, or one
/// without a non-empty `cursor` parameter. Never fetches anything.
pub fn extract_cursor(url: Option<&str>) -> Option<Cursor> {
    let url = url.map(str::trim).filter(|u| !u.is_empty())?;
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => Url::parse(SITE_ORIGIN).and_then(|base| base.join(url)).ok()?,
    };

    let cursor = parsed
        .query_pairs()
        .find(|(key, _)| key == "cursor")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(Cursor);

    debug!(found = cursor.is_some(), "Extracted pagination cursor");
    cursor
}
