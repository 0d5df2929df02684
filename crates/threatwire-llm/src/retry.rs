//! Retry with exponential back-off and jitter for chat-completion calls.
//!
//! [`RetryPolicy`] wraps a single fallible attempt and retries it while the
//! policy's predicate classifies the error as transient. Everything else is
//! returned on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

const MAX_DELAY_MS: u64 = 60_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts and connection failures, HTTP 408, HTTP 429 and
/// any 5xx status.
///
/// **Not retriable:** authentication and other 4xx errors, malformed
/// responses, and completions rejected by output validation.
#[must_use]
pub fn is_transient(err: &LlmError) -> bool {
    match err {
        LlmError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
        }
        LlmError::Status { status, .. } => *status == 408 || *status == 429 || *status >= 500,
        LlmError::Deserialize { .. }
        | LlmError::EmptyResponse
        | LlmError::ResponseTooShort { .. }
        | LlmError::InvalidBaseUrl { .. } => false,
    }
}

/// Bounded retry schedule plus the predicate deciding which errors it covers.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub retryable: fn(&LlmError) -> bool,
}

impl RetryPolicy {
    /// Policy retrying transient errors up to `max_retries` extra times.
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
            retryable: is_transient,
        }
    }

    /// Sleep before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at 60 s, then scaled by a random factor in `[0.75, 1.25)`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let computed = self
            .backoff_base_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
        let capped = computed.min(MAX_DELAY_MS);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        Duration::from_millis(delay_ms)
    }

    /// Runs `operation`, retrying per this policy.
    ///
    /// # Errors
    ///
    /// Returns the first non-retriable error, or the last error once retries
    /// are exhausted.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 0u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !(self.retryable)(&err) || attempt >= self.max_retries {
                        return Err(err);
                    }
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient generation error, retrying after back-off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
