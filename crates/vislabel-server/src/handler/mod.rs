//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use vislabel_core::DetectionService;
//! use vislabel_server::handler::routes;
//! use vislabel_server::service::{DetectionDefaults, ServiceState};
//!
//! let state = ServiceState::new(DetectionService::from_provider(provider), DetectionDefaults::default());
//! let app = routes().with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod labels;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and a JSON `404` fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(labels::routes())
        .merge(monitors::routes())
        .fallback(handler)
}
