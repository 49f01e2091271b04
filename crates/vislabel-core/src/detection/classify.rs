//! Translation of provider failure signals into the domain taxonomy.

use std::fmt;

use crate::{Error, ErrorKind};

/// Raw failure signal reported by a [`LabelProvider`].
///
/// `code` carries the provider's own error vocabulary (for Rekognition, the
/// exception name such as `InvalidS3ObjectException`).
///
/// [`LabelProvider`]: super::LabelProvider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Provider error code.
    pub code: String,
    /// Provider error message.
    pub message: String,
    /// HTTP status of the provider response, when there was one.
    pub status: Option<u16>,
}

impl ProviderFailure {
    /// Code used when the provider could not be reached at all.
    pub const NETWORK_ERROR: &'static str = "NetworkError";
    /// Code used when the provider answered with an unreadable body.
    pub const MALFORMED_RESPONSE: &'static str = "MalformedResponse";

    /// Creates a failure with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Attaches the HTTP status of the provider response.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Creates a failure for a provider that could not be reached.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(Self::NETWORK_ERROR, message)
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {}): {}", self.code, status, self.message),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ProviderFailure {}

/// Maps a provider error code onto a domain [`ErrorKind`].
///
/// Unrecognized codes map to [`ErrorKind::DetectionFailed`].
fn kind_for(code: &str) -> ErrorKind {
    match code {
        "InvalidParameterException" => ErrorKind::InvalidParameter,
        "InvalidS3ObjectException" => ErrorKind::InvalidDataReference,
        "InvalidImageFormatException" => ErrorKind::InvalidImageFormat,
        "ImageTooLargeException" => ErrorKind::InvalidImageSize,
        "AccessDeniedException" => ErrorKind::AccessDenied,
        "ProvisionedThroughputExceededException" => ErrorKind::TooManyRequests,
        "InternalServerError" => ErrorKind::InternalError,
        "ThrottlingException" => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::DetectionFailed,
    }
}

/// Classifies a provider failure into a domain [`Error`].
///
/// This is the only place provider error vocabulary is interpreted. The
/// provider message is kept as the error message and the failure itself as
/// the error source.
pub fn classify(failure: ProviderFailure) -> Error {
    let kind = kind_for(&failure.code);
    let message = if failure.message.is_empty() {
        failure.code.clone()
    } else {
        failure.message.clone()
    };

    Error::new(kind).with_message(message).with_source(failure)
}
