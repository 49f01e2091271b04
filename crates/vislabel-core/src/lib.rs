#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod detection;
mod error;
mod types;

pub use detection::{
    DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_IMAGE_BYTES, DetectionParameters, DetectionResult, DetectionService, ImageFetchConfig, ImageHandle, ImageResolver,
    ImageSource, LabelEntry, LabelProvider, ProviderFailure, classify, validate,
    validate_parameters,
};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use detection::{MockConfig, MockProvider};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use types::{ServiceHealth, ServiceStatus};
