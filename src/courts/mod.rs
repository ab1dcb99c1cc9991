//! Jurisdiction lookup boundary.
//!
//! Search only needs a space-joined list of court ids. How free text becomes
//! that list is up to the [`CourtResolver`] the caller plugs in.

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::search::SearchRequest;

/// Outcome of resolving a jurisdiction description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourtFilter {
    pub valid: bool,
    /// Space-joined court ids; empty means all courts.
    pub court_codes: String,
    pub description: String,
}

impl CourtFilter {
    pub fn all_courts() -> Self {
        Self {
            valid: true,
            court_codes: String::new(),
            description: "All courts".to_string(),
        }
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.court_codes.split_whitespace()
    }

    /// Copies the court ids onto `request`. An invalid filter leaves it unchanged.
    pub fn apply(&self, request: SearchRequest) -> SearchRequest {
        if self.valid {
            request.court(self.court_codes.clone())
        } else {
            request
        }
    }
}

/// Maps a jurisdiction description to court ids.
pub trait CourtResolver: Send + Sync {
    fn resolve(&self, text: &str) -> CourtFilter;
}

/// Accepts input that is already a list of court ids (`"ca9 cal"`,
/// `"SCOTUS, ca2"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCourtCodes;

impl CourtResolver for DirectCourtCodes {
    fn resolve(&self, text: &str) -> CourtFilter {
        let tokens: Vec<&str> = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return CourtFilter::all_courts();
        }

        if let Some(bad) = tokens
            .iter()
            .find(|t| !t.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            debug!(token = *bad, "Rejected court id");
            return CourtFilter {
                valid: false,
                court_codes: String::new(),
                description: format!("Unrecognized court id '{bad}'"),
            };
        }

        let codes = tokens
            .iter()
            .map(|t| t.to_ascii_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        CourtFilter {
            valid: true,
            description: format!("Courts: {codes}"),
            court_codes: codes,
        }
    }
}
