//! Closed error taxonomy for label detection.

use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Caller-visible categories of label detection failures.
///
/// Every provider-specific failure is translated into one of these kinds by
/// [`classify`], so nothing above the provider depends on provider vocabulary.
///
/// [`classify`]: crate::detection::classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range caller input.
    InvalidParameter,
    /// Referenced object-storage item does not exist or cannot be read.
    InvalidDataReference,
    /// Image bytes are not in a supported format.
    InvalidImageFormat,
    /// Image exceeds the provider size limits.
    InvalidImageSize,
    /// Credentials lack permission for the provider or the referenced object.
    AccessDenied,
    /// Provider throughput limit reached.
    TooManyRequests,
    /// Provider reported an internal failure.
    InternalError,
    /// Provider is throttling or temporarily unavailable.
    ServiceUnavailable,
    /// Provider failure that no other kind describes.
    DetectionFailed,
    /// Remote image could not be downloaded.
    ///
    /// Transport failure while resolving a URL source. It sits beside the
    /// detection taxonomy and never originates from the provider.
    ImageFetch,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 10] = [
        Self::InvalidParameter,
        Self::InvalidDataReference,
        Self::InvalidImageFormat,
        Self::InvalidImageSize,
        Self::AccessDenied,
        Self::TooManyRequests,
        Self::InternalError,
        Self::ServiceUnavailable,
        Self::DetectionFailed,
        Self::ImageFetch,
    ];

    /// Stable snake_case identifier used in logs and response bodies.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameter => "invalid_parameter",
            Self::InvalidDataReference => "invalid_data_reference",
            Self::InvalidImageFormat => "invalid_image_format",
            Self::InvalidImageSize => "invalid_image_size",
            Self::AccessDenied => "access_denied",
            Self::TooManyRequests => "too_many_requests",
            Self::InternalError => "internal_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::DetectionFailed => "detection_failed",
            Self::ImageFetch => "image_fetch",
        }
    }

    /// Returns true if the caller has to change the request to succeed.
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::InvalidParameter
                | Self::InvalidDataReference
                | Self::InvalidImageFormat
                | Self::InvalidImageSize
                | Self::AccessDenied
        )
    }

    /// Returns true for kinds belonging to the detection taxonomy.
    pub const fn is_detection_error(self) -> bool {
        !matches!(self, Self::ImageFetch)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured error type for label detection.
#[derive(Debug, Error)]
#[error("{kind}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_parameter() -> Self {
        Self::new(ErrorKind::InvalidParameter)
    }

    /// Creates a new invalid data reference error.
    pub fn invalid_data_reference() -> Self {
        Self::new(ErrorKind::InvalidDataReference)
    }

    /// Creates a new invalid image format error.
    pub fn invalid_image_format() -> Self {
        Self::new(ErrorKind::InvalidImageFormat)
    }

    /// Creates a new invalid image size error.
    pub fn invalid_image_size() -> Self {
        Self::new(ErrorKind::InvalidImageSize)
    }

    /// Creates a new access denied error.
    pub fn access_denied() -> Self {
        Self::new(ErrorKind::AccessDenied)
    }

    /// Creates a new too many requests error.
    pub fn too_many_requests() -> Self {
        Self::new(ErrorKind::TooManyRequests)
    }

    /// Creates a new internal error.
    pub fn internal_error() -> Self {
        Self::new(ErrorKind::InternalError)
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable() -> Self {
        Self::new(ErrorKind::ServiceUnavailable)
    }

    /// Creates a new generic detection failure.
    pub fn detection_failed() -> Self {
        Self::new(ErrorKind::DetectionFailed)
    }

    /// Creates a new image fetch error.
    pub fn image_fetch() -> Self {
        Self::new(ErrorKind::ImageFetch)
    }

    /// Returns the message, or the kind identifier when none was set.
    pub fn message_or_kind(&self) -> &str {
        self.message.as_deref().unwrap_or(self.kind.as_str())
    }

    /// Returns true if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// Returns true if the caller may reasonably try again later.
    ///
    /// Nothing in this crate retries; the decision is left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::TooManyRequests
                | ErrorKind::ServiceUnavailable
                | ErrorKind::InternalError
                | ErrorKind::ImageFetch
        )
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
