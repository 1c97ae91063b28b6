//! Retry with jittered exponential backoff.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::PipelineError;

/// Retry settings.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    /// Backoff base: retry `n` waits `base_delay * 2^(n-1)`, jittered.
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

/// Retries transient failures with exponential backoff and full jitter.
///
/// Transient outcomes are transport errors, per-attempt timeouts, and
/// delivered responses the caller's classifier flags (HTTP 408/429 at the
/// provider). Everything else, including `CircuitOpen` and cancellation,
/// short-circuits without consuming retry budget.
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Runs `op`, re-invoking it after a backoff for each transient failure
    /// until it succeeds or the retry budget is spent. The final outcome,
    /// success or not, is returned as-is.
    pub async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        is_transient_response: impl Fn(&T) -> bool,
        op: F,
    ) -> Result<T, PipelineError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        let mut retries = 0;
        loop {
            let outcome = op().await;
            let transient = match &outcome {
                Ok(response) => is_transient_response(response),
                Err(err) => err.is_transient(),
            };
            if !transient || retries >= self.config.max_retries {
                return outcome;
            }

            retries += 1;
            let delay = self.backoff_delay(retries);
            debug!(retry = retries, ?delay, "transient failure; backing off");
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Jittered exponential delay before retry `n` (1-based): uniform in
    /// `[base * 2^(n-1) / 2, base * 2^(n-1)]`.
    fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        let ceiling = self.config.base_delay.saturating_mul(1 << exponent);
        let ceiling_nanos = ceiling.as_nanos().min(u64::MAX as u128) as u64;
        let jittered = rand::rng().random_range(ceiling_nanos / 2..=ceiling_nanos);
        Duration::from_nanos(jittered)
    }
}
