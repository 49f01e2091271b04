//! Wire types of the `DetectLabels` JSON API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use vislabel_core::detection::ImageData;
use vislabel_core::{DetectionParameters, ImageHandle, LabelEntry};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetectLabelsRequest<'a> {
    pub image: WireImage<'a>,
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl<'a> DetectLabelsRequest<'a> {
    pub fn new(image: &'a ImageHandle, params: &DetectionParameters) -> Self {
        let image = match image.data() {
            ImageData::Bytes(bytes) => WireImage::Bytes(STANDARD.encode(bytes)),
            ImageData::Object { bucket, key } => WireImage::S3Object(WireS3Object {
                bucket,
                name: key,
            }),
        };

        Self {
            image,
            max_labels: params.max_labels,
            min_confidence: params.min_confidence,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) enum WireImage<'a> {
    Bytes(String),
    S3Object(WireS3Object<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireS3Object<'a> {
    pub bucket: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetectLabelsResponse {
    #[serde(default)]
    pub labels: Vec<WireLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireLabel {
    pub name: String,
    pub confidence: f32,
}

impl From<WireLabel> for LabelEntry {
    fn from(label: WireLabel) -> Self {
        LabelEntry::new(label.name, label.confidence)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "__type")]
    pub error_type: Option<String>,
    #[serde(alias = "Message")]
    pub message: Option<String>,
}

/// Strips the namespace (`com.amazonaws.rekognition#`) and any trailing
/// documentation reference (`:http://...`) from an error type.
pub(crate) fn error_code(raw: &str) -> &str {
    let code = raw.rsplit('#').next().unwrap_or(raw);
    code.split(':').next().unwrap_or(code).trim()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bytes_request_body() {
        let image = ImageHandle::from_bytes(vec![0xFF, 0xD8, 0xFF]);
        let body = DetectLabelsRequest::new(&image, &DetectionParameters::new(3, 50.0));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"Image": {"Bytes": "/9j/"}, "MaxLabels": 3, "MinConfidence": 50.0})
        );
    }

    #[test]
    fn test_object_request_body() {
        let image = ImageHandle::from_object("photos", "street/car.jpg");
        let body = DetectLabelsRequest::new(&image, &DetectionParameters::new(10, 55.0));

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "Image": {"S3Object": {"Bucket": "photos", "Name": "street/car.jpg"}},
                "MaxLabels": 10,
                "MinConfidence": 55.0
            })
        );
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let response: DetectLabelsResponse = serde_json::from_value(json!({
            "Labels": [
                {"Name": "Car", "Confidence": 92.1, "Instances": [], "Parents": [{"Name": "Vehicle"}]},
                {"Name": "Vehicle", "Confidence": 81.0}
            ],
            "LabelModelVersion": "3.0"
        }))
        .unwrap();

        let labels: Vec<LabelEntry> = response.labels.into_iter().map(Into::into).collect();
        assert_eq!(labels, vec![LabelEntry::new("Car", 92.1), LabelEntry::new("Vehicle", 81.0)]);
    }

    #[test]
    fn test_error_code_normalization() {
        assert_eq!(
            error_code("com.amazonaws.rekognition#InvalidS3ObjectException"),
            "InvalidS3ObjectException"
        );
        assert_eq!(
            error_code("AccessDeniedException:http://internal.amazon.com/coral/"),
            "AccessDeniedException"
        );
        assert_eq!(error_code("ThrottlingException"), "ThrottlingException");
    }

    #[test]
    fn test_error_body_message_casing() {
        let upper: ErrorBody =
            serde_json::from_str(r#"{"__type":"X","Message":"upper"}"#).unwrap();
        let lower: ErrorBody =
            serde_json::from_str(r#"{"__type":"X","message":"lower"}"#).unwrap();

        assert_eq!(upper.message.as_deref(), Some("upper"));
        assert_eq!(lower.message.as_deref(), Some("lower"));
    }
}
