//! # Rates Resilience
//!
//! Policy middleware for outbound HTTP calls.
//!
//! The policy stack (applied in order):
//! ```text
//! Call → [RateLimiter] → [Retry] → [CircuitBreaker] → [Timeout] → Transport
//! ```
//!
//! Each policy is an independent struct testable in isolation with
//! fault-injecting closures; [`ResiliencePipeline`] composes the four in the
//! fixed order above. All shared policy state (window counters, breaker
//! buckets) is owned by the pipeline instance and mutated behind mutexes,
//! never in globals. One pipeline instance serves one client for its
//! lifetime.

pub mod breaker;
pub mod error;
pub mod limiter;
pub mod pipeline;
pub mod retry;
pub mod timeout;

pub use breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use error::PipelineError;
pub use limiter::{FixedWindowLimiter, RateLimiterConfig};
pub use pipeline::{PipelineConfig, ResiliencePipeline};
pub use retry::{RetryConfig, RetryPolicy};
pub use timeout::AttemptTimeout;
