//! Environment-backed configuration.
//!
//! The API credential is required; everything else has a default. Override with
//! `CASELAW_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_FULL_TEXT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, MAX_ATTEMPTS,
};

/// Client configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults, then
/// [`Config::validate`] (client construction calls it too).
#[derive(Clone)]
pub struct Config {
    /// API credential, verbatim as configured (may carry a `Token ` prefix).
    pub api_token: Option<String>,

    /// REST API root. Default: [`DEFAULT_API_BASE`].
    pub api_base: String,

    /// Timeout for search and metadata requests. Default: 30s.
    pub request_timeout: Duration,

    /// Timeout for full-text opinion lookups. Default: 60s.
    pub full_text_timeout: Duration,

    /// Attempts per logical call, first try included. Default: `3`.
    pub max_attempts: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("full_text_timeout", &self.full_text_timeout)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            full_text_timeout: DEFAULT_FULL_TEXT_TIMEOUT,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl Config {
    const ENV_API_KEY: &'static str = "COURTLISTENER_API_KEY";
    const ENV_API_TOKEN: &'static str = "COURTLISTENER_TOKEN";
    const ENV_API_BASE: &'static str = "CASELAW_API_BASE";
    const ENV_REQUEST_TIMEOUT: &'static str = "CASELAW_REQUEST_TIMEOUT_SECS";
    const ENV_FULL_TEXT_TIMEOUT: &'static str = "CASELAW_FULL_TEXT_TIMEOUT_SECS";
    const ENV_MAX_ATTEMPTS: &'static str = "CASELAW_MAX_ATTEMPTS";

    /// Creates a config with `token` and defaults for everything else.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            api_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// A missing credential is not an error here; [`Config::validate`] reports it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_token = Self::parse_optional_string_from_env(Self::ENV_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_API_TOKEN));
        let api_base = Self::parse_string_from_env(Self::ENV_API_BASE, defaults.api_base);
        let request_timeout =
            Self::parse_secs_from_env(Self::ENV_REQUEST_TIMEOUT, defaults.request_timeout);
        let full_text_timeout =
            Self::parse_secs_from_env(Self::ENV_FULL_TEXT_TIMEOUT, defaults.full_text_timeout);
        let max_attempts = Self::parse_max_attempts_from_env(defaults.max_attempts)?;

        Ok(Self {
            api_token,
            api_base,
            request_timeout,
            full_text_timeout,
            max_attempts,
        })
    }

    /// Validates the credential, the API root and basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token().is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            });
        }

        reqwest::Url::parse(&self.api_base).map_err(|e| ConfigError::InvalidUrl {
            value: self.api_base.clone(),
            reason: e.to_string(),
        })?;

        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_ATTEMPTS,
                value: "0".to_string(),
                reason: "at least one attempt is required".to_string(),
            });
        }

        Ok(())
    }

    /// Returns the credential when it is present and not blank.
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Joins `path` onto the API root (`"search/"` → `".../v4/search/"`).
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn parse_max_attempts_from_env(default: u32) -> Result<u32, ConfigError> {
        match env::var(Self::ENV_MAX_ATTEMPTS) {
            Ok(value) => {
                let attempts: u32 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                            name: Self::ENV_MAX_ATTEMPTS,
                            value: value.clone(),
                            reason: e.to_string(),
                        })?;

                if attempts == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: Self::ENV_MAX_ATTEMPTS,
                        value,
                        reason: "at least one attempt is required".to_string(),
                    });
                }

                Ok(attempts)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_secs_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}
