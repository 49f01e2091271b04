//! Label detection service with observability.
//!
//! [`DetectionService`] wraps a [`LabelProvider`] and runs the full
//! detection pipeline: validation, image resolution, provider invocation,
//! failure classification and result normalization.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use super::{
    DetectionParameters, DetectionResult, ImageResolver, ImageSource, LabelProvider, Result,
    TRACING_TARGET, classify, validate,
};
use crate::types::ServiceHealth;

/// Label detection service.
///
/// Holds no per-request state; clones share the provider and the download
/// client, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct DetectionService {
    provider: Arc<dyn LabelProvider>,
    resolver: ImageResolver,
}

impl fmt::Debug for DetectionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionService")
            .field("provider", &self.provider.name())
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl DetectionService {
    /// Creates a new detection service from a provider.
    pub fn from_provider<P>(provider: P) -> Self
    where
        P: LabelProvider + 'static,
    {
        Self::from_shared(Arc::new(provider))
    }

    /// Creates a new detection service from an already shared provider.
    pub fn from_shared(provider: Arc<dyn LabelProvider>) -> Self {
        Self {
            provider,
            resolver: ImageResolver::default(),
        }
    }

    /// Replaces the resolver used for URL sources.
    pub fn with_resolver(mut self, resolver: ImageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Name of the wrapped provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Detects labels on the referenced image.
    ///
    /// Invalid parameters or an empty source are rejected before the image
    /// is resolved or the provider is contacted. Provider failures are
    /// classified into the domain taxonomy. Nothing is retried.
    pub async fn detect(
        &self,
        source: ImageSource,
        params: DetectionParameters,
    ) -> Result<DetectionResult> {
        let request_id = Uuid::now_v7();
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            provider = self.provider.name(),
            source = source.kind(),
            max_labels = params.max_labels,
            min_confidence = params.min_confidence,
            "Processing detection request"
        );

        if let Err(error) = validate(&params, &source) {
            tracing::debug!(
                target: TRACING_TARGET,
                request_id = %request_id,
                error = %error,
                "Detection request rejected"
            );
            return Err(error);
        }

        let image = match self.resolver.resolve(source).await {
            Ok(image) => image,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request_id,
                    error = %error,
                    "Image resolution failed"
                );
                return Err(error);
            }
        };

        let outcome = self.provider.detect_labels(&image, &params).await;
        let elapsed = Timestamp::now().duration_since(started_at);

        match outcome {
            Ok(labels) => {
                let result = DetectionResult::from_labels(labels);
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request_id,
                    label_count = result.label_count(),
                    image_size = image.byte_len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Detection successful"
                );
                Ok(result)
            }
            Err(failure) => {
                let error = classify(failure);
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request_id,
                    kind = %error.kind,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Detection failed"
                );
                Err(error)
            }
        }
    }

    /// Performs a health check on the wrapped provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }

    /// Creates a mock detection service for testing.
    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock() -> Self {
        Self::from_provider(super::MockProvider::default())
    }

    /// Creates a mock detection service with custom configuration.
    #[cfg(any(test, feature = "test-utils"))]
    #[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
    pub fn mock_with_config(config: super::MockConfig) -> Self {
        Self::from_provider(super::MockProvider::new(config))
    }
}
