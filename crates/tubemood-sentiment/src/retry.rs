//! Back-off policy for transient classification failures.
//!
//! Only network-level failures, HTTP 429 and HTTP 5xx are retried. Anything
//! else (bad request, exhausted quota reported as 4xx, malformed body) fails
//! the comment on the first attempt.

use std::time::Duration;

use crate::error::SentimentError;

const MAX_DELAY_MS: u64 = 60_000;

/// How many extra attempts a comment gets, and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    /// Exactly one attempt per comment.
    pub const NONE: RetryPolicy = RetryPolicy {
        max_retries: 0,
        backoff_base_ms: 1_000,
    };

    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Sleep before retry number `attempt` (1-based).
    ///
    /// | Attempt | Delay                         |
    /// |---------|-------------------------------|
    /// | 1       | base × 2⁰ ± 25 % jitter       |
    /// | 2       | base × 2¹ ± 25 % jitter       |
    /// | 3       | base × 2² ± 25 % jitter       |
    ///
    /// Capped at 60 s before jitter.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        let computed = self.backoff_base_ms.saturating_mul(1u64 << exponent);
        let capped = computed.min(MAX_DELAY_MS);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
        Duration::from_millis(delay_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Returns `true` for failures that may succeed on a later attempt.
pub(crate) fn is_retriable(err: &SentimentError) -> bool {
    match err {
        SentimentError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        SentimentError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        SentimentError::InvalidCredentials(_)
        | SentimentError::InvalidSource { .. }
        | SentimentError::ClassificationUnavailable(_)
        | SentimentError::Deserialize { .. }
        | SentimentError::InvalidBaseUrl { .. } => false,
    }
}
