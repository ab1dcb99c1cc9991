use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::search::model::null_as_default;

/// Text representations of an opinion, most useful first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    PlainText,
    HtmlWithCitations,
    Html,
    HtmlLawbox,
    HtmlColumbia,
    XmlHarvard,
}

impl TextField {
    /// Scan order for full-text lookup.
    pub const PRIORITY: [TextField; 6] = [
        TextField::PlainText,
        TextField::HtmlWithCitations,
        TextField::Html,
        TextField::HtmlLawbox,
        TextField::HtmlColumbia,
        TextField::XmlHarvard,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::PlainText => "plain_text",
            TextField::HtmlWithCitations => "html_with_citations",
            TextField::Html => "html",
            TextField::HtmlLawbox => "html_lawbox",
            TextField::HtmlColumbia => "html_columbia",
            TextField::XmlHarvard => "xml_harvard",
        }
    }

    /// Everything except plain text carries markup.
    pub fn is_html(&self) -> bool {
        !matches!(self, TextField::PlainText)
    }
}

/// An opinion resource: every text variant plus authorship metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpinionText {
    #[serde(rename = "id")]
    pub opinion_id: Option<u64>,
    pub absolute_url: Option<String>,
    #[serde(rename = "type")]
    pub opinion_type: Option<String>,
    pub plain_text: Option<String>,
    pub html: Option<String>,
    pub html_with_citations: Option<String>,
    pub html_lawbox: Option<String>,
    pub html_columbia: Option<String>,
    pub xml_harvard: Option<String>,
    /// Author reference (id or resource link, depending on API version).
    pub author: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub joined_by: Vec<Value>,
    pub per_curiam: Option<bool>,
    /// Parent cluster reference.
    pub cluster: Option<Value>,
    pub download_url: Option<String>,
}

impl OpinionText {
    /// Raw content of `field`, if present.
    pub fn text(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::PlainText => self.plain_text.as_deref(),
            TextField::HtmlWithCitations => self.html_with_citations.as_deref(),
            TextField::Html => self.html.as_deref(),
            TextField::HtmlLawbox => self.html_lawbox.as_deref(),
            TextField::HtmlColumbia => self.html_columbia.as_deref(),
            TextField::XmlHarvard => self.xml_harvard.as_deref(),
        }
    }

    /// First field, in [`TextField::PRIORITY`] order, that is non-blank.
    pub fn best_text(&self) -> Option<(TextField, &str)> {
        TextField::PRIORITY.iter().find_map(|&field| {
            self.text(field)
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(|text| (field, text))
        })
    }
}

/// Case-level metadata of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterDetails {
    #[serde(rename = "id")]
    pub cluster_id: Option<u64>,
    pub case_name: Option<String>,
    pub case_name_full: Option<String>,
    pub date_filed: Option<String>,
    pub docket: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub citations: Vec<Value>,
    pub judges: Option<String>,
    pub syllabus: Option<String>,
    pub procedural_history: Option<String>,
    pub posture: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sub_opinions: Vec<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub panel: Vec<Value>,
    pub source: Option<String>,
    pub precedential_status: Option<String>,
}

/// Opinion list response, reduced to what the full-text lookup reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct OpinionList {
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<OpinionText>,
}

/// The text picked for a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullText {
    pub cluster_id: u64,
    pub opinion_id: Option<u64>,
    pub absolute_url: Option<String>,
    pub opinion_type: Option<String>,
    pub text_field: TextField,
    /// Trimmed content.
    pub text: String,
    pub is_html: bool,
}

/// Result of a full-text lookup. The two misses are reported, not raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FullTextOutcome {
    Found(FullText),
    NoOpinions { cluster_id: u64 },
    NoTextContent { cluster_id: u64, opinion_count: usize },
}

impl FullTextOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, FullTextOutcome::Found(_))
    }

    pub fn text(&self) -> Option<&FullText> {
        match self {
            FullTextOutcome::Found(text) => Some(text),
            _ => None,
        }
    }

    /// Diagnostic for a miss.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            FullTextOutcome::Found(_) => None,
            FullTextOutcome::NoOpinions { .. } => Some("No opinions found for this cluster"),
            FullTextOutcome::NoTextContent { .. } => Some("No text content found in any opinion"),
        }
    }
}
