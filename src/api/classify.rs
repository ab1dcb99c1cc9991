//! Maps a non-success HTTP response onto the [`ApiError`] taxonomy.
//!
//! Pure data-in/data-out: no I/O, no logging side effects beyond `debug!`.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;
use tracing::debug;

use super::error::ApiError;
use crate::constants::DEFAULT_RETRY_AFTER;

/// 400-body keys that name the offending request field, in priority order.
///
/// The wire key `q` is reported as `query`, matching client-side validation.
const INVALID_FIELD_KEYS: [(&str, &str, &str); 3] = [
    ("order_by", "order_by", "Invalid order_by value"),
    ("q", "query", "Invalid query syntax"),
    ("court", "court", "Invalid court ID"),
];

/// Classifies a response by status, headers, and (best-effort JSON) body.
pub fn classify(status: u16, headers: &HeaderMap, body: &str) -> ApiError {
    let error_data = parse_body(body);

    let err = match status {
        401 => ApiError::Authentication {
            message: "invalid or missing API token; check COURTLISTENER_API_KEY".to_string(),
        },
        403 => ApiError::Authentication {
            message: format!(
                "access forbidden, the API token may lack permission: {}",
                render(&error_data)
            ),
        },
        429 => {
            let retry_after = parse_retry_after(headers);
            ApiError::RateLimited {
                message: format!(
                    "rate limit exceeded, retry after {} seconds",
                    retry_after.as_secs()
                ),
                retry_after: Some(retry_after),
            }
        }
        400 => classify_bad_request(error_data),
        404 => ApiError::NotFound {
            message: format!("resource not found: {}", render(&error_data)),
        },
        500..=599 => ApiError::Server {
            status,
            message: format!("{}; please try again later", render(&error_data)),
        },
        _ => ApiError::Generic {
            status,
            message: render(&error_data),
        },
    };

    debug!(status, kind = ?err.kind(), "Classified error response");
    err
}

fn classify_bad_request(error_data: Value) -> ApiError {
    if let Value::Object(ref map) = error_data {
        for (key, field, label) in INVALID_FIELD_KEYS {
            if let Some(value) = map.get(key) {
                return ApiError::InvalidQuery {
                    message: format!("{label}: {}", render(value)),
                    field: Some(field.to_string()),
                    details: Some(error_data.clone()),
                };
            }
        }
    }

    ApiError::InvalidQuery {
        message: format!("bad request: {}", render(&error_data)),
        field: None,
        details: Some(error_data),
    }
}

/// Parses the body as JSON, falling back to `{"detail": <raw text>}`.
fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| {
        let mut map = serde_json::Map::new();
        map.insert("detail".to_string(), Value::String(body.to_string()));
        Value::Object(map)
    })
}

/// `Retry-After` in whole seconds; anything else falls back to the default.
fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.len() == 1 => render(&items[0]),
        other => other.to_string(),
    }
}
