//! Image sources and their resolution into provider-ready handles.

use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::Client;
use url::Url;

use super::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_IMAGE_BYTES, ImageFetchConfig, TRACING_TARGET};
use crate::{Error, Result};

/// Image reference as supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Raw encoded image bytes.
    Bytes(Bytes),
    /// Object held in a storage bucket; resolved by the provider.
    Object {
        /// Bucket name.
        bucket: String,
        /// Object key inside the bucket.
        key: String,
    },
    /// Remote image downloaded before detection.
    Url(String),
}

impl ImageSource {
    /// Creates a raw bytes source.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Creates an object-storage source.
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Object {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Creates a URL source.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Short name of the source form, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Object { .. } => "object",
            Self::Url(_) => "url",
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Object { bucket, key } => f
                .debug_struct("Object")
                .field("bucket", bucket)
                .field("key", key)
                .finish(),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// Image payload carried by an [`ImageHandle`].
#[derive(Clone, PartialEq, Eq)]
pub enum ImageData {
    /// Encoded image bytes.
    Bytes(Bytes),
    /// Storage reference the provider reads itself.
    Object {
        /// Bucket name.
        bucket: String,
        /// Object key inside the bucket.
        key: String,
    },
}

/// Immutable, request-scoped image reference ready for a provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageHandle {
    data: ImageData,
}

impl ImageHandle {
    /// Wraps encoded image bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            data: ImageData::Bytes(bytes.into()),
        }
    }

    /// Wraps a storage reference.
    pub fn from_object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            data: ImageData::Object {
                bucket: bucket.into(),
                key: key.into(),
            },
        }
    }

    /// Returns the payload.
    pub fn data(&self) -> &ImageData {
        &self.data
    }

    /// Returns the bytes if this handle carries them.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.data {
            ImageData::Bytes(bytes) => Some(bytes),
            ImageData::Object { .. } => None,
        }
    }

    /// Number of bytes carried, zero for storage references.
    pub fn byte_len(&self) -> usize {
        self.as_bytes().map_or(0, <[u8]>::len)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            ImageData::Bytes(bytes) => f
                .debug_struct("ImageHandle")
                .field("bytes", &bytes.len())
                .finish(),
            ImageData::Object { bucket, key } => f
                .debug_struct("ImageHandle")
                .field("bucket", bucket)
                .field("key", key)
                .finish(),
        }
    }
}

/// Turns an [`ImageSource`] into an [`ImageHandle`].
///
/// Bytes pass through and storage references are forwarded untouched. URLs
/// are downloaded once, within the timeout and size cap; there is no retry.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    http: Client,
    max_bytes: usize,
}

impl ImageResolver {
    /// Creates a resolver whose downloads time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("vislabel/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::internal_error()
                    .with_message("failed to build HTTP client for image downloads")
                    .with_source(e)
            })?;

        Ok(Self::with_client(http))
    }

    /// Creates a resolver from download limits.
    pub fn from_config(config: &ImageFetchConfig) -> Result<Self> {
        Ok(Self::new(config.timeout())?.with_max_bytes(config.max_image_size))
    }

    /// Creates a resolver around an existing HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self {
            http,
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Sets the largest accepted download, in bytes.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Largest accepted download, in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Resolves the source into a handle.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidParameter`] for a malformed or non-HTTP(S) URL.
    /// - [`ErrorKind::ImageFetch`] when the download fails or the server does
    ///   not answer with a success status.
    /// - [`ErrorKind::InvalidImageSize`] when the image is larger than
    ///   [`max_bytes`](Self::max_bytes).
    ///
    /// [`ErrorKind::InvalidParameter`]: crate::ErrorKind::InvalidParameter
    /// [`ErrorKind::ImageFetch`]: crate::ErrorKind::ImageFetch
    /// [`ErrorKind::InvalidImageSize`]: crate::ErrorKind::InvalidImageSize
    pub async fn resolve(&self, source: ImageSource) -> Result<ImageHandle> {
        match source {
            ImageSource::Bytes(bytes) => Ok(ImageHandle::from_bytes(bytes)),
            ImageSource::Object { bucket, key } => Ok(ImageHandle::from_object(bucket, key)),
            ImageSource::Url(raw) => {
                let url = parse_image_url(&raw)?;
                let bytes = self.fetch(url).await?;
                Ok(ImageHandle::from_bytes(bytes))
            }
        }
    }

    async fn fetch(&self, url: Url) -> Result<Bytes> {
        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            max_bytes = self.max_bytes,
            "Downloading image"
        );

        let mut response = self.http.get(url.clone()).send().await.map_err(|e| {
            Error::image_fetch()
                .with_message(format!("failed to download image from {url}"))
                .with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::image_fetch()
                .with_message(format!("image download from {url} returned {status}")));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes as u64
        {
            return Err(self.too_large(&url, length));
        }

        let mut body = BytesMut::new();
        loop {
            let chunk = response.chunk().await.map_err(|e| {
                Error::image_fetch()
                    .with_message(format!("failed to read image body from {url}"))
                    .with_source(e)
            })?;

            let Some(chunk) = chunk else { break };
            let received = body.len() + chunk.len();
            if received > self.max_bytes {
                return Err(self.too_large(&url, received as u64));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            size = body.len(),
            "Image downloaded"
        );

        Ok(body.freeze())
    }

    fn too_large(&self, url: &Url, size: u64) -> Error {
        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            size,
            max_bytes = self.max_bytes,
            "Image download exceeds size limit"
        );

        Error::invalid_image_size().with_message(format!(
            "image at {url} is larger than {} bytes",
            self.max_bytes
        ))
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT).unwrap_or_else(|error| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Falling back to an HTTP client without download timeout"
            );
            Self::with_client(Client::new())
        })
    }
}

/// Parses a caller URL, accepting only absolute HTTP(S) URLs.
fn parse_image_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        Error::invalid_parameter()
            .with_message(format!("malformed image URL '{raw}'"))
            .with_source(e)
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::invalid_parameter()
            .with_message(format!("unsupported image URL scheme '{scheme}'"))),
    }
}
