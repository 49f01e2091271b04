//! Application state and dependency injection.

mod defaults;

use vislabel_core::DetectionService;

pub use crate::service::defaults::{
    DEFAULT_MAX_LABELS, DEFAULT_MIN_CONFIDENCE, DetectionDefaults,
};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub detection: DetectionService,
    pub defaults: DetectionDefaults,
}

impl ServiceState {
    /// Creates application state around a detection service.
    pub fn new(detection: DetectionService, defaults: DetectionDefaults) -> Self {
        Self {
            detection,
            defaults,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(detection: DetectionService);
impl_di!(defaults: DetectionDefaults);
