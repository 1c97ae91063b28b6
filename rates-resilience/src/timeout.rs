//! Per-attempt deadline enforcement.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::PipelineError;

/// Bounds each individual attempt, including retries, by a fixed deadline.
/// Expiry drops the in-flight future and surfaces a transient
/// [`PipelineError::Timeout`], so the attempt counts against both the retry
/// budget and the circuit breaker.
pub struct AttemptTimeout {
    deadline: Duration,
}

impl AttemptTimeout {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub async fn bound<T, Fut>(&self, attempt: Fut) -> Result<T, PipelineError>
    where
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        match tokio::time::timeout(self.deadline, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!(deadline = ?self.deadline, "attempt timed out");
                Err(PipelineError::Timeout(self.deadline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slow_attempts_are_cancelled_at_the_deadline() {
        let timeout = AttemptTimeout::new(Duration::from_secs(5));
        let outcome: Result<(), _> = timeout
            .bound(async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;
        assert_eq!(outcome, Err(PipelineError::Timeout(Duration::from_secs(5))));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_attempts_pass_through() {
        let timeout = AttemptTimeout::new(Duration::from_secs(5));
        let outcome = timeout.bound(async { Ok(7) }).await;
        assert_eq!(outcome, Ok(7));
    }
}
