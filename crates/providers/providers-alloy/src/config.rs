//! Node request configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout and retry settings applied to every node request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Per-attempt request timeout, in milliseconds.
    pub timeout_ms: u64,
    /// Number of retries after the first attempt. Zero disables retrying.
    pub max_retries: usize,
    /// Delay before the first retry, in milliseconds. Doubles on every further retry.
    pub retry_backoff_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000, max_retries: 3, retry_backoff_ms: 500 }
    }
}

impl ProviderConfig {
    /// Returns the per-attempt timeout.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the delay before the first retry.
    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
