//! Middleware configuration for the HTTP server.
//!
//! Both groups are re-exported from `vislabel-server` and support CLI
//! arguments as well as environment variables.
//!
//! ```bash
//! vislabel --request-timeout 60 --max-body-size 8388608
//! ```

use clap::Args;
use serde::{Deserialize, Serialize};
use vislabel_server::middleware::{RecoveryConfig, SecurityConfig};

use super::TRACING_TARGET_CONFIG;

/// Longest accepted request timeout, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Middleware configuration combining recovery and security settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,

    /// Request body limit.
    #[clap(flatten)]
    pub security: SecurityConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout and body limit.
    pub fn validate(&self) -> anyhow::Result<()> {
        let timeout = self.recovery.request_timeout;
        anyhow::ensure!(
            (1..=MAX_REQUEST_TIMEOUT_SECS).contains(&timeout),
            "Request timeout {timeout} seconds is invalid. Must be between 1 and \
             {MAX_REQUEST_TIMEOUT_SECS} seconds."
        );

        anyhow::ensure!(
            self.security.max_body_size > 0,
            "Maximum body size must be greater than zero"
        );

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_body_size = self.security.max_body_size,
            "Security configuration"
        );
    }
}
