//! Provider configuration loading from environment.

use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.frankfurter.dev";
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the Frankfurter client.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Upstream base URL, without a trailing slash.
    pub base_url: String,
    /// Deadline bounding each individual attempt.
    pub attempt_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    /// Loads configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// * `FRANKFURTER_BASE_URL` - upstream base URL
    /// * `PROVIDER_ATTEMPT_TIMEOUT_SECS` - per-attempt deadline in seconds
    pub fn from_env() -> Self {
        let base_url =
            env::var("FRANKFURTER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let attempt_timeout = env::var("PROVIDER_ATTEMPT_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ATTEMPT_TIMEOUT);

        Self {
            base_url,
            attempt_timeout,
        }
    }
}
