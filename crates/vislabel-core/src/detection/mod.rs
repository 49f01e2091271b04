//! Label detection: validation, image resolution, provider invocation and
//! result normalization.
//!
//! # Example
//!
//! ```rust,ignore
//! use vislabel_core::detection::{DetectionParameters, DetectionService, ImageSource};
//!
//! let service = DetectionService::from_provider(my_provider);
//! let params = DetectionParameters::new(3, 50.0);
//! let result = service.detect(ImageSource::url("https://example.com/car.jpg"), params).await?;
//! println!("{}", result.to_json()?);
//! ```

mod classify;
mod fetch;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock;
mod parameters;
mod result;
mod service;
mod source;
mod validate;

pub use classify::{ProviderFailure, classify};
pub use fetch::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_IMAGE_BYTES, ImageFetchConfig};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::{MockConfig, MockProvider};
pub use parameters::DetectionParameters;
pub use result::{DetectionResult, LabelEntry};
pub use service::DetectionService;
pub use source::{ImageData, ImageHandle, ImageResolver, ImageSource};
pub use validate::{validate, validate_parameters};

use crate::types::ServiceHealth;
pub use crate::{Error, Result};

/// Tracing target for detection operations.
pub const TRACING_TARGET: &str = "vislabel_core::detection";

/// External capability that turns an image into named labels.
///
/// Implementations receive an already validated request and must report
/// failures as raw [`ProviderFailure`] signals; translation into the domain
/// taxonomy happens in [`classify`]. Implementations must not retry.
#[async_trait::async_trait]
pub trait LabelProvider: Send + Sync {
    /// Short provider identifier used in logs and health output.
    fn name(&self) -> &str;

    /// Detects labels on the image, asking the backend to drop labels below
    /// `params.min_confidence` and to return at most `params.max_labels`.
    async fn detect_labels(
        &self,
        image: &ImageHandle,
        params: &DetectionParameters,
    ) -> Result<Vec<LabelEntry>, ProviderFailure>;

    /// Performs a health check on the provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
