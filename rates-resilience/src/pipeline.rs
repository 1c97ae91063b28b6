//! The composed pipeline: rate limiter → retry → circuit breaker → timeout.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::error::PipelineError;
use crate::limiter::{FixedWindowLimiter, RateLimiterConfig};
use crate::retry::{RetryConfig, RetryPolicy};
use crate::timeout::AttemptTimeout;

/// Settings for the whole pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub rate_limiter: RateLimiterConfig,
    pub retry: RetryConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    /// Deadline bounding each individual attempt, retries included.
    pub attempt_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rate_limiter: RateLimiterConfig::default(),
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            attempt_timeout: Duration::from_secs(5),
        }
    }
}

/// Decorates one logical call with the four policies in fixed order:
/// the rate limiter gates admission, the retry loop re-issues transient
/// failures, the circuit breaker samples every attempt, and the timeout
/// bounds each attempt individually.
///
/// The pipeline owns all policy state; a client owns one pipeline for its
/// lifetime and shares it across concurrent calls.
pub struct ResiliencePipeline {
    limiter: FixedWindowLimiter,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
    timeout: AttemptTimeout,
}

impl ResiliencePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            limiter: FixedWindowLimiter::new(config.rate_limiter),
            retry: RetryPolicy::new(config.retry),
            breaker: CircuitBreaker::new(config.circuit_breaker),
            timeout: AttemptTimeout::new(config.attempt_timeout),
        }
    }

    /// Executes one logical call.
    ///
    /// `attempt` builds a fresh transport future per invocation; the retry
    /// loop may invoke it several times. `is_transient_response` labels a
    /// delivered response as transient (HTTP 408/429 at the provider) for
    /// retry and breaker accounting.
    pub async fn execute<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        is_transient_response: impl Fn(&T) -> bool,
        attempt: F,
    ) -> Result<T, PipelineError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        self.limiter.acquire(cancel).await?;

        let pipeline = self;
        let classify = &is_transient_response;
        let attempt = &attempt;
        self.retry
            .run(cancel, classify, move || {
                let bounded = pipeline.timeout.bound(attempt());
                async move {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Err(PipelineError::Cancelled),
                        outcome = pipeline.breaker.call(classify, bounded) => outcome,
                    }
                }
            })
            .await
    }
}
