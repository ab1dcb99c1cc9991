use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::ConfigError;

const TOKEN_PREFIX: &str = "Token ";

/// Which credential format an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    /// `/search/`: the credential goes out exactly as configured.
    Search,
    /// `/opinions/`, `/clusters/`: always `Token <raw>`.
    Resource,
}

/// Both credential header sets, built once per client.
#[derive(Clone)]
pub struct AuthHeaders {
    search: HeaderMap,
    resource: HeaderMap,
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders").finish_non_exhaustive()
    }
}

impl AuthHeaders {
    /// Builds both header maps from the configured credential.
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim();
        let raw = token.strip_prefix(TOKEN_PREFIX).unwrap_or(token).trim();

        Ok(Self {
            search: header_map(token)?,
            resource: header_map(&format!("{TOKEN_PREFIX}{raw}"))?,
        })
    }

    /// Headers for `family`.
    pub fn for_family(&self, family: EndpointFamily) -> &HeaderMap {
        match family {
            EndpointFamily::Search => &self.search,
            EndpointFamily::Resource => &self.resource,
        }
    }
}

fn header_map(authorization: &str) -> Result<HeaderMap, ConfigError> {
    let mut value =
        HeaderValue::from_str(authorization).map_err(|_| ConfigError::InvalidCredential)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
