//! Gateway configuration loaded from environment variables.
//!
//! Every setting has a default so local development needs no
//! configuration at all.

use std::time::Duration;

/// Connection settings for [`crate::RestGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the backend API, without a trailing slash.
    /// Env: `TOOLBAY_API_BASE_URL`
    /// Default: `http://localhost:8080/api`
    pub base_url: String,

    /// Per-request timeout.
    /// Env: `TOOLBAY_HTTP_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults on missing or malformed values.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("TOOLBAY_API_BASE_URL") {
            let url = url.trim();
            if url.is_empty() {
                tracing::warn!("Empty TOOLBAY_API_BASE_URL, using default");
            } else {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }

        if let Ok(secs) = std::env::var("TOOLBAY_HTTP_TIMEOUT_SECS") {
            match parse_timeout_secs(&secs) {
                Some(timeout) => config.timeout = timeout,
                None => {
                    tracing::warn!(
                        value = %secs,
                        "Invalid TOOLBAY_HTTP_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
}

/// Parse a positive integer number of seconds.
fn parse_timeout_secs(value: &str) -> Option<Duration> {
    let secs: u64 = value.trim().parse().ok()?;
    if secs == 0 {
        return None;
    }
    Some(Duration::from_secs(secs))
}
