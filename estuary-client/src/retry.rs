//! Retry with exponential backoff.
//!
//! Requests are rebuilt for every attempt, so single-use bodies (streamed
//! multipart forms) can be retried. Whether an error may be retried depends
//! on the request's [`Idempotency`].

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use estuary_core::constants::{
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS,
};
use estuary_core::error::{EstuaryError, Result};

/// How many times to try a request and how long to wait in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff_ms: u64,
    /// Cap on the delay between retries
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Delay before retry number `retry` (1-based): doubles each time, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u64
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

/// Whether replaying a request can duplicate a side effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Idempotency {
    /// Lookups. Any recoverable error may be retried.
    Idempotent,
    /// Uploads and writes. Only retried when the request never left.
    NonIdempotent,
}

impl Idempotency {
    /// Returns true if `err` may be retried for a request of this kind.
    pub fn allows_retry(self, err: &EstuaryError) -> bool {
        match self {
            Idempotency::Idempotent => err.is_recoverable(),
            Idempotency::NonIdempotent => err.is_unsent(),
        }
    }
}

/// Runs `attempt_fn` until it succeeds, fails with an error that may not be
/// retried, or the policy runs out of attempts.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    idempotency: Idempotency,
    description: &str,
    mut attempt_fn: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_attempts || !idempotency.allows_retry(&e) {
                    return Err(e);
                }
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    description,
                    error = %e,
                    "Request failed, retrying with backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
