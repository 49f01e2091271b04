//! Security middleware: request body limit and response hardening headers.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::set_header::SetResponseHeaderLayer;

/// Default maximum request body size: 16MB
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Security middleware configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityConfig {
    /// Maximum accepted request body size in bytes.
    ///
    /// Applies to JSON bodies (base64 images included) and raw image uploads.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)
    )]
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl SecurityConfig {
    /// Creates a configuration with the given body size limit.
    pub fn with_max_body_size(max_body_size: usize) -> Self {
        Self { max_body_size }
    }
}

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers the body size limit and security headers.
    ///
    /// Bodies above the limit are rejected by the extractors with a `413`
    /// JSON error.
    fn with_security(self, config: &SecurityConfig) -> Self;

    /// Layers security middleware with default configuration.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, config: &SecurityConfig) -> Self {
        self.layer(DefaultBodyLimit::max(config.max_body_size))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&SecurityConfig::default())
    }
}
