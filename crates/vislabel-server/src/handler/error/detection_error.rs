//! Detection error to HTTP error conversion.
//!
//! Maps the closed detection taxonomy onto status codes and attaches a
//! suggestion the caller can act on.

use vislabel_core::ErrorKind as DetectionErrorKind;

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for detection error conversions.
const TRACING_TARGET: &str = "vislabel_server::handler::detection";

impl From<DetectionErrorKind> for ErrorKind {
    fn from(kind: DetectionErrorKind) -> Self {
        match kind {
            DetectionErrorKind::InvalidParameter => Self::InvalidParameter,
            DetectionErrorKind::InvalidDataReference => Self::InvalidDataReference,
            DetectionErrorKind::InvalidImageFormat => Self::InvalidImageFormat,
            DetectionErrorKind::InvalidImageSize => Self::InvalidImageSize,
            DetectionErrorKind::AccessDenied => Self::AccessDenied,
            DetectionErrorKind::TooManyRequests => Self::TooManyRequests,
            DetectionErrorKind::ServiceUnavailable => Self::ServiceUnavailable,
            DetectionErrorKind::InternalError => Self::InternalError,
            DetectionErrorKind::DetectionFailed => Self::DetectionFailed,
            DetectionErrorKind::ImageFetch => Self::ImageFetch,
        }
    }
}

impl From<vislabel_core::Error> for HttpError<'static> {
    fn from(error: vislabel_core::Error) -> Self {
        if error.is_client_error() {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                error_kind = %error.kind,
                "Detection request rejected"
            );
        } else {
            tracing::error!(
                target: TRACING_TARGET,
                error = %error,
                error_kind = %error.kind,
                retryable = error.is_retryable(),
                "Detection failed"
            );
        }

        let mut http_error = ErrorKind::from(error.kind).into_error();

        if let Some(message) = error.message {
            http_error = http_error.with_message(message);
        }

        if let Some(suggestion) = suggestion(error.kind) {
            http_error = http_error.with_suggestion(suggestion);
        }

        if let Some(source) = error.source {
            http_error = http_error.with_context(source.to_string());
        }

        http_error
    }
}

fn suggestion(kind: DetectionErrorKind) -> Option<&'static str> {
    match kind {
        DetectionErrorKind::InvalidParameter => Some(
            "Provide exactly one image source, maxLabels of at least 1 and minConfidence between 0 and 100",
        ),
        DetectionErrorKind::InvalidDataReference => {
            Some("Check that the bucket and key exist and are readable by the service")
        }
        DetectionErrorKind::InvalidImageFormat => Some("Send a JPEG or PNG image"),
        DetectionErrorKind::InvalidImageSize => {
            Some("Send a smaller image or reference it from object storage")
        }
        DetectionErrorKind::AccessDenied => {
            Some("Check the permissions granted to the service credentials")
        }
        DetectionErrorKind::TooManyRequests | DetectionErrorKind::ServiceUnavailable => {
            Some("Retry after a short delay")
        }
        DetectionErrorKind::InternalError => Some("Retry the request later"),
        DetectionErrorKind::ImageFetch => {
            Some("Check that the image URL is publicly reachable")
        }
        DetectionErrorKind::DetectionFailed => None,
    }
}
