//! Label detection request types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use vislabel_core::ImageSource;

/// JSON body of `POST /labels`.
///
/// Exactly one image source has to be given: `imageUrl`, `image` (base64
/// encoded bytes) or `bucket` together with `key`.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectLabels {
    /// Remote image to download.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Base64 encoded image bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Object storage bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Object storage key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Maximum number of labels to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_labels: Option<i32>,
    /// Minimum label confidence, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f32>,
}

impl DetectLabels {
    /// Fills absent fields from the query string.
    ///
    /// A URL given in both places counts as two sources.
    pub fn merge_query(mut self, query: LabelsQuery) -> (Self, Option<String>) {
        self.max_labels = self.max_labels.or(query.max_labels);
        self.min_confidence = self.min_confidence.or(query.min_confidence);
        (self, query.image_url)
    }

    /// Picks the single image source of the request.
    ///
    /// `extra_url` is a URL supplied outside the body.
    pub fn image_source(&self, extra_url: Option<&str>) -> vislabel_core::Result<ImageSource> {
        let object = match (&self.bucket, &self.key) {
            (Some(bucket), Some(key)) => Some(ImageSource::object(bucket, key)),
            (None, None) => None,
            _ => {
                return Err(vislabel_core::Error::invalid_parameter()
                    .with_message("bucket and key must be given together"));
            }
        };

        let bytes = match &self.image {
            Some(encoded) => Some(decode_image(encoded)?),
            None => None,
        };

        let mut sources: Vec<ImageSource> = [
            self.image_url.as_deref().map(ImageSource::url),
            extra_url.map(ImageSource::url),
            bytes,
            object,
        ]
        .into_iter()
        .flatten()
        .collect();

        match sources.len() {
            0 => Err(vislabel_core::Error::invalid_parameter()
                .with_message("one of imageUrl, image or bucket and key is required")),
            1 => Ok(sources.remove(0)),
            n => Err(vislabel_core::Error::invalid_parameter().with_message(format!(
                "exactly one image source is allowed, got {n}"
            ))),
        }
    }
}

fn decode_image(encoded: &str) -> vislabel_core::Result<ImageSource> {
    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
        vislabel_core::Error::invalid_parameter()
            .with_message("image is not valid base64")
            .with_source(e)
    })?;

    Ok(ImageSource::bytes(bytes))
}

/// Query string of `POST /labels`.
///
/// `imageURL` is the historical parameter name; `imageUrl` is accepted too.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelsQuery {
    /// Remote image to download.
    #[serde(default, rename = "imageURL", alias = "imageUrl")]
    pub image_url: Option<String>,
    /// Maximum number of labels to return.
    #[serde(default)]
    pub max_labels: Option<i32>,
    /// Minimum label confidence, in percent.
    #[serde(default)]
    pub min_confidence: Option<f32>,
}

/// Query string of `POST /labels/bytes`.
#[must_use]
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionQuery {
    /// Maximum number of labels to return.
    #[serde(default)]
    pub max_labels: Option<i32>,
    /// Minimum label confidence, in percent.
    #[serde(default)]
    pub min_confidence: Option<f32>,
}

#[cfg(test)]
mod tests {
    use vislabel_core::ErrorKind;

    use super::*;

    #[test]
    fn single_url_source() {
        let request = DetectLabels {
            image_url: Some("https://example.com/car.jpg".into()),
            ..Default::default()
        };

        let source = request.image_source(None).unwrap();
        assert_eq!(source.kind(), ImageSource::url("x").kind());
    }

    #[test]
    fn base64_source_is_decoded() {
        let request = DetectLabels {
            image: Some("/9j/".into()),
            ..Default::default()
        };

        match request.image_source(None).unwrap() {
            ImageSource::Bytes(bytes) => assert_eq!(&bytes[..], &[0xFF, 0xD8, 0xFF]),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let request = DetectLabels {
            image: Some("not base64!".into()),
            ..Default::default()
        };

        let error = request.image_source(None).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidParameter);
    }

    #[test]
    fn missing_and_multiple_sources_are_rejected() {
        let none = DetectLabels::default().image_source(None).unwrap_err();
        assert_eq!(none.kind, ErrorKind::InvalidParameter);

        let both = DetectLabels {
            image_url: Some("https://example.com/car.jpg".into()),
            bucket: Some("photos".into()),
            key: Some("car.jpg".into()),
            ..Default::default()
        };
        assert_eq!(
            both.image_source(None).unwrap_err().kind,
            ErrorKind::InvalidParameter
        );

        let body_and_query = DetectLabels {
            image_url: Some("https://example.com/a.jpg".into()),
            ..Default::default()
        };
        assert!(
            body_and_query
                .image_source(Some("https://example.com/b.jpg"))
                .is_err()
        );
    }

    #[test]
    fn partial_object_reference_is_rejected() {
        let request = DetectLabels {
            bucket: Some("photos".into()),
            ..Default::default()
        };

        let error = request.image_source(None).unwrap_err();
        assert!(error.to_string().contains("together"));
    }

    #[test]
    fn query_fills_missing_parameters() {
        let body = DetectLabels {
            max_labels: Some(3),
            ..Default::default()
        };
        let query: LabelsQuery =
            serde_json::from_str(r#"{"imageURL":"https://example.com/car.jpg","maxLabels":7,"minConfidence":50.0}"#)
                .unwrap();

        let (merged, url) = body.merge_query(query);
        assert_eq!(merged.max_labels, Some(3));
        assert_eq!(merged.min_confidence, Some(50.0));
        assert_eq!(url.as_deref(), Some("https://example.com/car.jpg"));
    }

    #[test]
    fn query_accepts_both_url_spellings() {
        let upper: LabelsQuery = serde_json::from_str(r#"{"imageURL":"u"}"#).unwrap();
        let camel: LabelsQuery = serde_json::from_str(r#"{"imageUrl":"u"}"#).unwrap();
        assert_eq!(upper.image_url.as_deref(), Some("u"));
        assert_eq!(camel.image_url.as_deref(), Some("u"));
    }
}
