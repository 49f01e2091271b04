//! Scripted label provider for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! vislabel-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use vislabel_core::detection::{DetectionService, LabelEntry, MockProvider};
//!
//! let provider = MockProvider::with_labels(vec![LabelEntry::new("Car", 92.1)]);
//! let service = DetectionService::from_provider(provider.clone());
//! // ...
//! assert_eq!(provider.invocations(), 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    DetectionParameters, DetectionService, ImageHandle, LabelEntry, LabelProvider,
    ProviderFailure, Result,
};
use crate::types::ServiceHealth;

/// Configuration for the mock provider.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Labels the provider knows about, before confidence and count limits.
    pub labels: Vec<LabelEntry>,
    /// Failure returned instead of labels, when set.
    pub failure: Option<ProviderFailure>,
}

impl MockConfig {
    /// Converts this configuration into a detection service.
    pub fn into_service(self) -> DetectionService {
        MockProvider::new(self).into_service()
    }
}

/// Scripted provider that counts its invocations.
///
/// Honors `min_confidence` and `max_labels` the way a real backend would.
/// Clones share the invocation counter.
#[derive(Clone, Debug)]
pub struct MockProvider {
    config: Arc<MockConfig>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}

impl MockProvider {
    /// Creates a new mock provider with the given configuration.
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a mock provider that answers with the given labels.
    pub fn with_labels(labels: Vec<LabelEntry>) -> Self {
        Self::new(MockConfig {
            labels,
            ..Default::default()
        })
    }

    /// Creates a mock provider that always fails.
    pub fn failing(failure: ProviderFailure) -> Self {
        Self::new(MockConfig {
            failure: Some(failure),
            ..Default::default()
        })
    }

    /// Number of times `detect_labels` was called.
    pub fn invocations(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Converts this provider into a detection service.
    pub fn into_service(self) -> DetectionService {
        DetectionService::from_provider(self)
    }
}

#[async_trait::async_trait]
impl LabelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn detect_labels(
        &self,
        _image: &ImageHandle,
        params: &DetectionParameters,
    ) -> Result<Vec<LabelEntry>, ProviderFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = &self.config.failure {
            return Err(failure.clone());
        }

        let limit = usize::try_from(params.max_labels).unwrap_or(0);
        Ok(self
            .config
            .labels
            .iter()
            .filter(|label| label.confidence >= params.min_confidence)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
