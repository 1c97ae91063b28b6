//! The result envelope returned by every service operation.

use serde::{Deserialize, Serialize};

/// Uniform success/failure wrapper.
///
/// Invariants, enforced by the constructors:
/// - `succeeded == true` implies `data` is present and `details` is empty
/// - `succeeded == false` implies `data` is absent
///
/// A `ServiceResult` is immutable once constructed; the web layer maps
/// `succeeded == false` to a client error carrying `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    data: Option<T>,
    succeeded: bool,
    details: String,
}

impl<T> ServiceResult<T> {
    /// Creates a successful result wrapping `data`.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            succeeded: true,
            details: String::new(),
        }
    }

    /// Creates a failed result carrying a human-readable message.
    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            data: None,
            succeeded: false,
            details: details.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the envelope, yielding the payload of a successful result.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}
