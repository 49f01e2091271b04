#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing targets for observability
/// Logging target for Rekognition client operations.
pub const TRACING_TARGET: &str = "vislabel_rekognition::client";

/// Logging target for credential resolution.
pub const CREDENTIALS_TARGET: &str = "vislabel_rekognition::credentials";

pub mod client;
mod credentials;
mod model;
mod signing;

#[cfg(feature = "config")]
#[cfg_attr(docsrs, doc(cfg(feature = "config")))]
pub use client::RekognitionArgs;
pub use client::{KNOWN_REGIONS, RekognitionClient, RekognitionConfig, RekognitionConfigBuilder};
pub use credentials::{CredentialSource, Credentials};

/// Result type for all Rekognition operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring the client or resolving credentials.
///
/// Failures of the detection call itself are reported as
/// [`vislabel_core::ProviderFailure`] and never use this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Credentials could not be resolved
    #[error("Credentials error: {message}")]
    Credentials {
        /// Description of what is missing or malformed
        message: String,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credentials error
    pub fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config",
            Error::Credentials { .. } => "credentials",
            Error::Io(_) => "io",
        }
    }
}
