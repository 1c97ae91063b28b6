//! Provider-failure taxonomy.

use crate::result::ServiceResult;

/// Everything that can go wrong between the conversion service and the
/// upstream rate provider.
///
/// Each variant renders the human-readable message that ends up in
/// `ServiceResult::details`; no internal identifiers leak past this type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Upstream 404: unknown currency or symbol. Terminal, never retried.
    #[error("Currency not found")]
    NotFound,

    /// The outbound rate limiter is saturated; the call never left the process.
    #[error("Request rejected: provider rate limit reached")]
    Throttled,

    /// The circuit breaker is open; the call failed fast without network access.
    #[error("Provider temporarily unavailable")]
    CircuitOpen,

    /// Every attempt exceeded the per-attempt deadline.
    #[error("Provider request timed out")]
    Timeout,

    /// Network-level failure after the retry budget was exhausted.
    #[error("Provider request failed: {0}")]
    Transport(String),

    /// A 2xx body that could not be decoded. Terminal, never retried.
    #[error("Malformed provider response")]
    Decode,

    /// Business-rule rejection; no network call was made.
    #[error("{0}")]
    PolicyRejected(String),

    /// Any other non-2xx upstream status.
    #[error("Error")]
    Upstream,

    /// The caller cancelled the operation.
    #[error("Request was cancelled")]
    Cancelled,
}

impl<T> From<ProviderError> for ServiceResult<T> {
    fn from(err: ProviderError) -> Self {
        ServiceResult::fail(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_fixed_message() {
        assert_eq!(ProviderError::NotFound.to_string(), "Currency not found");
    }

    #[test]
    fn generic_upstream_renders_error() {
        assert_eq!(ProviderError::Upstream.to_string(), "Error");
    }

    #[test]
    fn policy_rejection_renders_verbatim() {
        let err = ProviderError::PolicyRejected("Incorrect date range.".into());
        assert_eq!(err.to_string(), "Incorrect date range.");
    }

    #[test]
    fn converts_into_failed_envelope() {
        let result: ServiceResult<()> = ProviderError::NotFound.into();
        assert!(!result.succeeded());
        assert_eq!(result.details(), "Currency not found");
    }
}
