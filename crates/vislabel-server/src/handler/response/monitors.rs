//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use vislabel_core::ServiceHealth;

/// Health report of the service and its label provider.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatus {
    /// Whether the provider can serve requests.
    pub is_healthy: bool,
    /// Name of the configured label provider.
    pub provider: String,
    /// When the provider was checked.
    pub checked_at: Timestamp,
    /// Reason the provider is not healthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Application version.
    pub version: String,
}

impl MonitorStatus {
    /// Builds a report from a provider health check.
    pub fn from_health(provider: impl Into<String>, health: ServiceHealth) -> Self {
        Self {
            is_healthy: health.is_healthy(),
            provider: provider.into(),
            checked_at: health.checked_at,
            message: health.message,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
