//! Provider health reporting.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Coarse health state of a label provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceStatus {
    /// Provider is configured and reachable.
    Healthy,
    /// Provider cannot serve requests.
    Unhealthy,
}

/// Result of a provider health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    /// Current status.
    pub status: ServiceStatus,
    /// When the check ran.
    pub checked_at: Timestamp,
    /// Optional detail, usually set when not healthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceHealth {
    /// Creates a healthy report timestamped now.
    pub fn healthy() -> Self {
        Self {
            status: ServiceStatus::Healthy,
            checked_at: Timestamp::now(),
            message: None,
        }
    }

    /// Creates an unhealthy report with a reason.
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: ServiceStatus::Unhealthy,
            checked_at: Timestamp::now(),
            message: Some(message.into()),
        }
    }

    /// Returns true if the status is [`ServiceStatus::Healthy`].
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_two_states() {
        let healthy = serde_json::to_value(ServiceHealth::healthy()).unwrap();
        assert_eq!(healthy["status"], "healthy");
        assert!(healthy.get("message").is_none());

        let unhealthy = serde_json::to_value(ServiceHealth::unhealthy("no credentials")).unwrap();
        assert_eq!(unhealthy["status"], "unhealthy");
        assert_eq!(unhealthy["message"], "no credentials");

        assert!(serde_json::from_str::<ServiceStatus>(r#""degraded""#).is_err());
    }
}
