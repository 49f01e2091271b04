//! Raw body extractor.

use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use bytes::Bytes;
use derive_more::{Deref, From};

use crate::handler::{Error, ErrorKind};

/// Request body as raw bytes.
///
/// Same as extracting [`Bytes`] directly, except that rejections (including
/// the body size limit) become JSON error responses.
#[must_use]
#[derive(Debug, Clone, Default, Deref, From)]
pub struct RawBody(pub Bytes);

impl RawBody {
    /// Returns the inner bytes.
    #[inline]
    pub fn into_inner(self) -> Bytes {
        self.0
    }
}

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self(bytes))
    }
}

impl From<BytesRejection> for Error<'static> {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ErrorKind::PayloadTooLarge
                .with_message("Request body exceeds the configured size limit")
                .with_suggestion("Reference large images by URL or object storage instead")
                .with_context(rejection.body_text());
        }

        ErrorKind::BadRequest
            .with_message("Failed to read request body")
            .with_context(rejection.body_text())
    }
}
