//! Circuit breaker with a bucketed sliding sampling window.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::PipelineError;

/// Circuit breaker settings.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Length of the sliding sampling window.
    pub sampling_window: Duration,
    /// Buckets the window is divided into.
    pub buckets: usize,
    /// Failure ratio above which the circuit opens.
    pub failure_ratio: f64,
    /// Minimum samples in the window before the ratio is considered.
    pub minimum_throughput: u64,
    /// Time spent open before a trial call is admitted.
    pub cool_down: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sampling_window: Duration::from_secs(10),
            buckets: 10,
            failure_ratio: 0.2,
            minimum_throughput: 100,
            cool_down: Duration::from_secs(5),
        }
    }
}

/// Breaker state machine positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through; failures are sampled.
    Closed,
    /// Calls fail fast without reaching the network.
    Open,
    /// One trial call is in flight; its outcome decides the next state.
    HalfOpen,
}

#[derive(Clone, Copy, Default)]
struct Bucket {
    total: u64,
    failures: u64,
}

struct BreakerState {
    state: CircuitState,
    buckets: Vec<Bucket>,
    current: usize,
    bucket_start: Instant,
    opened_at: Instant,
    probe_in_flight: bool,
}

enum Classification {
    Success,
    Failure,
    /// Cancelled outcomes are not samples.
    Ignored,
}

/// Sliding-window circuit breaker.
///
/// Counts call outcomes in per-second buckets; once the failure ratio over
/// the window exceeds the threshold with enough throughput, the circuit
/// opens and calls fail fast with [`PipelineError::CircuitOpen`]. After the
/// cool-down a single trial call is admitted: success closes the circuit and
/// resets the window, failure re-opens it.
///
/// Only transient outcomes count as failures; deterministic upstream errors
/// such as 404 record as successes so they cannot trip the circuit.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let now = Instant::now();
        let state = BreakerState {
            state: CircuitState::Closed,
            buckets: vec![Bucket::default(); config.buckets.max(1)],
            current: 0,
            bucket_start: now,
            opened_at: now,
            probe_in_flight: false,
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Current state machine position, for diagnostics and tests.
    pub fn state(&self) -> CircuitState {
        self.state.lock().expect("breaker state poisoned").state
    }

    /// Guards one attempt. Fails fast with `CircuitOpen` when the circuit is
    /// open (or a trial is already in flight); otherwise awaits `attempt`
    /// and records its outcome.
    pub async fn call<T, Fut>(
        &self,
        is_transient_response: impl Fn(&T) -> bool,
        attempt: Fut,
    ) -> Result<T, PipelineError>
    where
        Fut: Future<Output = Result<T, PipelineError>>,
    {
        let probe = self.admit()?;
        // If the caller is dropped mid-attempt (cancellation race), the
        // guard releases the trial slot so the breaker cannot wedge.
        let mut guard = ProbeGuard {
            breaker: self,
            armed: probe,
        };
        let outcome = attempt.await;
        guard.armed = false;

        match Self::classify(&outcome, &is_transient_response) {
            Classification::Success => self.record(probe, false),
            Classification::Failure => self.record(probe, true),
            Classification::Ignored => {
                if probe {
                    self.release_probe();
                }
            }
        }
        outcome
    }

    fn classify<T>(
        outcome: &Result<T, PipelineError>,
        is_transient_response: &impl Fn(&T) -> bool,
    ) -> Classification {
        match outcome {
            Ok(response) if is_transient_response(response) => Classification::Failure,
            Ok(_) => Classification::Success,
            Err(err) if err.is_transient() => Classification::Failure,
            Err(_) => Classification::Ignored,
        }
    }

    /// Returns whether the admitted call is the half-open trial.
    fn admit(&self) -> Result<bool, PipelineError> {
        let mut state = self.state.lock().expect("breaker state poisoned");
        match state.state {
            CircuitState::Closed => Ok(false),
            CircuitState::Open => {
                if Instant::now().duration_since(state.opened_at) >= self.config.cool_down {
                    state.state = CircuitState::HalfOpen;
                    state.probe_in_flight = true;
                    debug!("cool-down elapsed; admitting trial call");
                    Ok(true)
                } else {
                    Err(PipelineError::CircuitOpen)
                }
            }
            CircuitState::HalfOpen => {
                if state.probe_in_flight {
                    Err(PipelineError::CircuitOpen)
                } else {
                    state.probe_in_flight = true;
                    Ok(true)
                }
            }
        }
    }

    fn record(&self, probe: bool, failure: bool) {
        let mut guard = self.state.lock().expect("breaker state poisoned");
        let state = &mut *guard;
        let now = Instant::now();

        if probe {
            state.probe_in_flight = false;
            if failure {
                state.state = CircuitState::Open;
                state.opened_at = now;
                warn!("trial call failed; circuit re-opened");
            } else {
                state.state = CircuitState::Closed;
                Self::reset_window(state, now);
                debug!("trial call succeeded; circuit closed");
            }
            return;
        }

        // A non-probe call that finished after the circuit moved on is stale.
        if state.state != CircuitState::Closed {
            return;
        }

        self.advance_buckets(state, now);
        let bucket = &mut state.buckets[state.current];
        bucket.total += 1;
        if failure {
            bucket.failures += 1;
        }

        let (total, failures) = state
            .buckets
            .iter()
            .fold((0u64, 0u64), |(t, f), b| (t + b.total, f + b.failures));
        if total >= self.config.minimum_throughput
            && (failures as f64) > self.config.failure_ratio * (total as f64)
        {
            state.state = CircuitState::Open;
            state.opened_at = now;
            warn!(total, failures, "failure ratio exceeded; circuit opened");
        }
    }

    fn release_probe(&self) {
        let mut state = self.state.lock().expect("breaker state poisoned");
        state.probe_in_flight = false;
    }

    fn advance_buckets(&self, state: &mut BreakerState, now: Instant) {
        let bucket_len = self.config.sampling_window / state.buckets.len() as u32;
        if now.duration_since(state.bucket_start) >= self.config.sampling_window {
            Self::reset_window(state, now);
            return;
        }
        while now.duration_since(state.bucket_start) >= bucket_len {
            state.current = (state.current + 1) % state.buckets.len();
            state.buckets[state.current] = Bucket::default();
            state.bucket_start += bucket_len;
        }
    }

    fn reset_window(state: &mut BreakerState, now: Instant) {
        for bucket in &mut state.buckets {
            *bucket = Bucket::default();
        }
        state.current = 0;
        state.bucket_start = now;
    }
}

struct ProbeGuard<'a> {
    breaker: &'a CircuitBreaker,
    armed: bool,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.breaker.release_probe();
        }
    }
}
