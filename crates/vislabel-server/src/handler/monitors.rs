//! Health check handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use vislabel_core::{DetectionService, ServiceHealth};

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "vislabel_server::handler::monitors";

/// Reports whether the label provider can serve requests.
///
/// Answers `503` with the same body when it cannot.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(detection): State<DetectionService>,
) -> (StatusCode, Json<MonitorStatus>) {
    let health = match detection.health_check().await {
        Ok(health) => health,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Health check failed"
            );
            ServiceHealth::unhealthy(error.message_or_kind())
        }
    };

    let response = MonitorStatus::from_health(detection.provider_name(), health);

    let status_code = if response.is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        provider = %response.provider,
        is_healthy = response.is_healthy,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
