//! Bounded retry loop with a per-kind backoff table.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::{ApiError, ErrorKind};
use crate::constants::{
    CONNECT_ERROR_BACKOFF, DEFAULT_RETRY_AFTER, MAX_ATTEMPTS, RETRY_BACKOFF_FACTOR,
    SERVER_ERROR_BACKOFF,
};

/// How long to wait before the next attempt after an error of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry straight away.
    Immediate,
    /// `factor^attempt * base`.
    Exponential { base: Duration },
    /// The error's own `retry_after`, else `factor^attempt * base`.
    RetryAfterOr { base: Duration },
}

impl Backoff {
    /// Wait before retrying after failed attempt `attempt` (0-indexed).
    pub fn delay(&self, attempt: u32, factor: u32, err: &ApiError) -> Duration {
        match *self {
            Backoff::Immediate => Duration::ZERO,
            Backoff::Exponential { base } => scale(base, factor, attempt),
            Backoff::RetryAfterOr { base } => err
                .retry_after()
                .filter(|wait| !wait.is_zero())
                .unwrap_or_else(|| scale(base, factor, attempt)),
        }
    }
}

fn scale(base: Duration, factor: u32, attempt: u32) -> Duration {
    base.saturating_mul(factor.saturating_pow(attempt))
}

/// Per-call bookkeeping; lives for one [`RetryPolicy::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryState {
    /// Attempts made so far.
    pub attempt: u32,
    /// Kind of the most recent failure.
    pub last_error_kind: Option<ErrorKind>,
    /// Wait scheduled before the next attempt.
    pub wait: Duration,
}

impl RetryState {
    fn record(&mut self, kind: ErrorKind, wait: Duration) {
        self.last_error_kind = Some(kind);
        self.wait = wait;
    }
}

/// Attempt budget plus the kind → backoff lookup.
///
/// Kinds without a rule are never retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    factor: u32,
    rules: HashMap<ErrorKind, Backoff>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let rules = HashMap::from([
            (
                ErrorKind::RateLimited,
                Backoff::RetryAfterOr {
                    base: DEFAULT_RETRY_AFTER,
                },
            ),
            (
                ErrorKind::ServerError,
                Backoff::Exponential {
                    base: SERVER_ERROR_BACKOFF,
                },
            ),
            (ErrorKind::Timeout, Backoff::Immediate),
            (
                ErrorKind::ConnectionFailed,
                Backoff::Exponential {
                    base: CONNECT_ERROR_BACKOFF,
                },
            ),
        ]);

        Self {
            max_attempts: MAX_ATTEMPTS,
            factor: RETRY_BACKOFF_FACTOR,
            rules,
        }
    }
}

impl RetryPolicy {
    /// Default table with a different attempt budget.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Sets (or replaces) the rule for `kind`.
    pub fn with_rule(mut self, kind: ErrorKind, backoff: Backoff) -> Self {
        self.rules.insert(kind, backoff);
        self
    }

    /// Removes the rule for `kind`, making it fail fast.
    pub fn without(mut self, kind: ErrorKind) -> Self {
        self.rules.remove(&kind);
        self
    }

    /// Returns the rule for `kind`, if it is retried at all.
    pub fn backoff(&self, kind: ErrorKind) -> Option<Backoff> {
        self.rules.get(&kind).copied()
    }

    /// Attempts per call, first try included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait before the next attempt, or `None` when `err` must be surfaced.
    pub fn next_delay(&self, attempt: u32, err: &ApiError) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        self.backoff(err.kind())
            .map(|backoff| backoff.delay(attempt, self.factor, err))
    }

    /// Runs `call` until it succeeds, fails with a non-retryable error, or
    /// the attempt budget is spent.
    ///
    /// On exhaustion the most recent error is returned; a zero budget yields
    /// a generic error without calling `call`.
    pub async fn run<T, F, Fut>(&self, label: &str, mut call: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut state = RetryState::default();

        while state.attempt < self.max_attempts {
            let attempt = state.attempt;
            state.attempt += 1;

            debug!(
                label,
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                "Sending request"
            );

            let err = match call().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let kind = err.kind();
            let Some(wait) = self.next_delay(attempt, &err) else {
                state.record(kind, Duration::ZERO);
                if self.backoff(kind).is_some() {
                    warn!(label, attempts = state.attempt, ?kind, error = %err, "Retries exhausted");
                }
                return Err(err);
            };

            state.record(kind, wait);
            warn!(
                label,
                attempt = state.attempt,
                max_attempts = self.max_attempts,
                kind = ?state.last_error_kind,
                wait_secs = state.wait.as_secs_f64(),
                error = %err,
                "Request failed, retrying"
            );

            if !state.wait.is_zero() {
                tokio::time::sleep(state.wait).await;
            }
        }

        Err(ApiError::Generic {
            status: 0,
            message: format!("{label}: no attempt was made (max_attempts = 0)"),
        })
    }
}
