//! Pipeline-level failure type.

use std::time::Duration;

/// Failures produced by the pipeline itself, as opposed to HTTP responses
/// delivered through it.
///
/// `Timeout` and `Transport` are transient: they consume retry budget and
/// count against the circuit breaker. The rest short-circuit immediately.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Both the window permits and the queue were exhausted.
    #[error("rate limiter saturated; call rejected")]
    Throttled,

    /// The circuit breaker is open; the call never reached the network.
    #[error("circuit breaker is open; call rejected")]
    CircuitOpen,

    /// One attempt exceeded the per-attempt deadline.
    #[error("attempt exceeded the {0:?} deadline")]
    Timeout(Duration),

    /// Network-level failure reported by the transport.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The caller's cancellation token fired.
    #[error("call was cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Whether this failure consumes retry budget and breaker samples.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}
