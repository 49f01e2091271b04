//! Limits for downloading images referenced by URL.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default timeout for downloading a remote image.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest image accepted from a URL: the inline bytes limit of Rekognition.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Timeout and size cap applied to URL downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ImageFetchConfig {
    /// Seconds allowed for downloading an image given by URL
    #[cfg_attr(
        feature = "config",
        arg(long = "image-fetch-timeout", env = "IMAGE_FETCH_TIMEOUT", default_value_t = 30)
    )]
    pub fetch_timeout: u64,

    /// Largest image, in bytes, downloaded from a URL
    #[cfg_attr(
        feature = "config",
        arg(long = "max-image-size", env = "MAX_IMAGE_SIZE", default_value_t = DEFAULT_MAX_IMAGE_BYTES)
    )]
    pub max_image_size: usize,
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT.as_secs(),
            max_image_size: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ImageFetchConfig {
    /// Download timeout as a `Duration`.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}
