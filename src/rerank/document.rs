//! Text sent to the reranker for one search hit.

use crate::constants::truncate_chars;
use crate::search::SearchResult;

const MAX_EXTRA_OPINIONS: usize = 2;
const SYLLABUS_CHARS: usize = 500;
const FALLBACK_FIELD_CHARS: usize = 300;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Builds the newline-joined `Label: value` text for `result`.
///
/// Extra opinion snippets come from the first two opinions and skip any that
/// repeat the top-level snippet. The syllabus wins over posture and history.
pub fn compose_rerank_text(result: &SearchResult) -> String {
    let case_name = result.case_name.as_deref().unwrap_or_default();
    let snippet = result.snippet.as_str();
    let mut parts: Vec<String> = Vec::new();

    if !case_name.is_empty() {
        parts.push(format!("Case: {case_name}"));
    }
    if let Some(court) = non_empty(result.court.as_deref()) {
        parts.push(format!("Court: {court}"));
    }
    if !snippet.is_empty() {
        parts.push(format!("Snippet: {snippet}"));
    }

    let extra = result
        .opinions
        .iter()
        .take(MAX_EXTRA_OPINIONS)
        .filter_map(|opinion| non_empty(opinion.snippet.as_deref()))
        .filter(|op_snippet| *op_snippet != snippet);
    for (i, op_snippet) in extra.enumerate() {
        parts.push(format!("Opinion {}: {op_snippet}", i + 1));
    }

    match non_empty(result.syllabus.as_deref()) {
        Some(syllabus) => {
            parts.push(format!(
                "Summary: {}",
                truncate_chars(syllabus, SYLLABUS_CHARS)
            ));
        }
        None => {
            if let Some(posture) = non_empty(result.posture.as_deref()) {
                parts.push(format!(
                    "Posture: {}",
                    truncate_chars(posture, FALLBACK_FIELD_CHARS)
                ));
            }
            if let Some(history) = non_empty(result.procedural_history.as_deref()) {
                parts.push(format!(
                    "History: {}",
                    truncate_chars(history, FALLBACK_FIELD_CHARS)
                ));
            }
        }
    }

    if parts.is_empty() {
        case_name.to_string()
    } else {
        parts.join("\n")
    }
}
