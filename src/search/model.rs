use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::cursor::{Cursor, extract_cursor};
use super::request::SearchMode;
use crate::constants::SITE_ORIGIN;

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One opinion attached to a search hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opinion {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub opinion_type: Option<String>,
    pub snippet: Option<String>,
    pub author_id: Option<u64>,
    pub per_curiam: Option<bool>,
    pub download_url: Option<String>,
    pub local_path: Option<String>,
    /// Ids of opinions this one cites.
    #[serde(deserialize_with = "null_as_default")]
    pub cites: Vec<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub joined_by_ids: Vec<u64>,
}

/// Search hit as the API sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSearchItem {
    #[serde(rename = "caseName")]
    case_name: Option<String>,
    #[serde(rename = "caseNameFull")]
    case_name_full: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    citation: Vec<String>,
    court: Option<String>,
    court_id: Option<String>,
    #[serde(rename = "dateFiled")]
    date_filed: Option<String>,
    #[serde(rename = "dateArgued")]
    date_argued: Option<String>,
    #[serde(rename = "docketNumber")]
    docket_number: Option<String>,
    #[serde(rename = "citeCount", deserialize_with = "null_as_default")]
    cite_count: u64,
    status: Option<String>,
    judge: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    absolute_url: String,
    cluster_id: Option<u64>,
    docket_id: Option<u64>,
    syllabus: Option<String>,
    #[serde(rename = "suitNature")]
    suit_nature: Option<String>,
    procedural_history: Option<String>,
    posture: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    panel_names: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    court_citation_string: String,
    #[serde(deserialize_with = "null_as_default")]
    opinions: Vec<Opinion>,
    meta: Option<Value>,
}

/// Search response body as the API sends it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSearchPage {
    count: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    results: Vec<RawSearchItem>,
    next: Option<String>,
    previous: Option<String>,
}

/// One normalized case record.
///
/// The first opinion's snippet and download link are copied to the top level;
/// the full opinion list stays in `opinions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub case_name: Option<String>,
    pub case_name_full: Option<String>,
    pub citation: Vec<String>,
    pub court: Option<String>,
    pub court_id: Option<String>,
    pub date_filed: Option<String>,
    pub date_argued: Option<String>,
    pub docket_number: Option<String>,
    pub cite_count: u64,
    pub status: Option<String>,
    pub judge: Option<String>,
    /// Browsable link on the public site.
    pub url: String,
    pub absolute_url: String,
    pub cluster_id: Option<u64>,
    pub docket_id: Option<u64>,
    pub syllabus: Option<String>,
    pub suit_nature: Option<String>,
    pub procedural_history: Option<String>,
    pub posture: Option<String>,
    pub panel_names: Vec<String>,
    pub court_citation_string: String,
    pub snippet: String,
    pub download_url: String,
    /// Lexical relevance (`meta.score.bm25`).
    pub score_bm25: Option<f64>,
    /// Embedding relevance (`meta.score.semantic`).
    pub score_semantic: Option<f64>,
    /// The raw `meta` object, untouched.
    pub meta: Value,
    pub opinions: Vec<Opinion>,
}

impl From<RawSearchItem> for SearchResult {
    fn from(raw: RawSearchItem) -> Self {
        let meta = raw.meta.unwrap_or_else(|| Value::Object(Default::default()));
        let score = |key: &str| {
            meta.get("score")
                .and_then(|score| score.get(key))
                .and_then(Value::as_f64)
        };
        let score_bm25 = score("bm25");
        let score_semantic = score("semantic");

        let first = raw.opinions.first();
        let snippet = first
            .and_then(|o| o.snippet.clone())
            .unwrap_or_default();
        let download_url = first
            .and_then(|o| o.download_url.clone())
            .unwrap_or_default();

        Self {
            case_name: raw.case_name,
            case_name_full: raw.case_name_full,
            citation: raw.citation,
            court: raw.court,
            court_id: raw.court_id,
            date_filed: raw.date_filed,
            date_argued: raw.date_argued,
            docket_number: raw.docket_number,
            cite_count: raw.cite_count,
            status: raw.status,
            judge: raw.judge,
            url: format!("{SITE_ORIGIN}{}", raw.absolute_url),
            absolute_url: raw.absolute_url,
            cluster_id: raw.cluster_id,
            docket_id: raw.docket_id,
            syllabus: raw.syllabus,
            suit_nature: raw.suit_nature,
            procedural_history: raw.procedural_history,
            posture: raw.posture,
            panel_names: raw.panel_names,
            court_citation_string: raw.court_citation_string,
            snippet,
            download_url,
            score_bm25,
            score_semantic,
            meta,
            opinions: raw.opinions,
        }
    }
}

/// Cursors and raw links of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub next_cursor: Option<Cursor>,
    pub prev_cursor: Option<Cursor>,
    pub next_url: Option<String>,
    pub prev_url: Option<String>,
}

impl Pagination {
    fn from_links(next: Option<String>, previous: Option<String>) -> Self {
        Self {
            next_cursor: extract_cursor(next.as_deref()),
            prev_cursor: extract_cursor(previous.as_deref()),
            next_url: next,
            prev_url: previous,
        }
    }

    /// `true` iff a next cursor exists.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// One normalized page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total hits reported by the API (may exceed what is reachable).
    pub count: u64,
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
    /// Fully encoded request URL.
    pub api_url: String,
    pub mode: SearchMode,
    /// The caller's query, before citation folding.
    pub query: String,
}

impl SearchPage {
    pub(crate) fn from_raw(raw: RawSearchPage, mode: SearchMode, query: &str, api_url: String) -> Self {
        Self {
            count: raw.count.unwrap_or(0),
            results: raw.results.into_iter().map(SearchResult::from).collect(),
            pagination: Pagination::from_links(raw.next, raw.previous),
            api_url,
            mode,
            query: query.to_string(),
        }
    }

    pub fn has_more(&self) -> bool {
        self.pagination.has_more()
    }

    pub fn results_returned(&self) -> usize {
        self.results.len()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.pagination.next_cursor.as_ref()
    }
}
