//! Configuration module for Wallet Sentry
//! Handles the remote analysis API origin and request timeout

use std::time::Duration;

/// Default per-request timeout (seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the analysis API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin/prefix of the analysis API, without trailing slash.
    /// Empty means same-origin relative URLs (deployment behind a proxy).
    pub base_url: String,

    /// Timeout applied to every analysis and assistant request
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = std::env::var("WALLET_API_BASE").unwrap_or_default();
        let timeout_secs = std::env::var("WALLET_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl ClientConfig {
    /// Build a config with an explicit base URL (trailing slash trimmed)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Full URL for an API path like `/api/wallet/0xabc`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
