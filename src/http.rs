//! Shared HTTP client configuration.

use crate::error::{Result, TldwError};
use std::time::Duration;

/// Default timeout for outbound requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an HTTP client with the default timeout.
pub fn create_client() -> Result<reqwest::Client> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an HTTP client with a custom timeout.
///
/// The timeout bounds each transport call; the pipeline itself imposes none.
pub fn create_client_with_timeout(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TldwError::Config(format!("Failed to create HTTP client: {}", e)))
}
