//! Request validation.

use super::{DetectionParameters, ImageSource};
use crate::{Error, Result};

/// Checks parameters and image source before any remote work happens.
///
/// Parameter bounds are checked first, then the presence of the image
/// reference. The check is synchronous and has no side effects.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`] when:
/// - `max_labels < 1`
/// - `min_confidence` is not a number within `0..=100`
/// - the image bytes, bucket, key or URL are empty
///
/// [`ErrorKind::InvalidParameter`]: crate::ErrorKind::InvalidParameter
pub fn validate(params: &DetectionParameters, source: &ImageSource) -> Result<()> {
    validate_parameters(params)?;

    match source {
        ImageSource::Bytes(bytes) if bytes.is_empty() => {
            Err(Error::invalid_parameter().with_message("image bytes are empty"))
        }
        ImageSource::Object { bucket, .. } if bucket.trim().is_empty() => {
            Err(Error::invalid_parameter().with_message("bucket name is empty"))
        }
        ImageSource::Object { key, .. } if key.trim().is_empty() => {
            Err(Error::invalid_parameter().with_message("object key is empty"))
        }
        ImageSource::Url(url) if url.trim().is_empty() => {
            Err(Error::invalid_parameter().with_message("image URL is empty"))
        }
        _ => Ok(()),
    }
}

/// Checks `max_labels` and `min_confidence` bounds only.
///
/// Lets a caller reject bad parameters before it has picked an image source.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`] with the same messages as
/// [`validate`].
///
/// [`ErrorKind::InvalidParameter`]: crate::ErrorKind::InvalidParameter
pub fn validate_parameters(params: &DetectionParameters) -> Result<()> {
    if params.max_labels < 1 {
        return Err(Error::invalid_parameter().with_message(format!(
            "maxLabels must be at least 1, got {}",
            params.max_labels
        )));
    }

    if !(DetectionParameters::MIN_CONFIDENCE..=DetectionParameters::MAX_CONFIDENCE)
        .contains(&params.min_confidence)
    {
        return Err(Error::invalid_parameter().with_message(format!(
            "minConfidence must be between 0 and 100, got {}",
            params.min_confidence
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn jpeg() -> ImageSource {
        ImageSource::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn accepts_bounds() {
        assert!(validate(&DetectionParameters::new(1, 0.0), &jpeg()).is_ok());
        assert!(validate(&DetectionParameters::new(1000, 100.0), &jpeg()).is_ok());
        assert!(validate(&DetectionParameters::new(3, 50.0), &jpeg()).is_ok());
    }

    #[test]
    fn rejects_max_labels_below_one() {
        for max_labels in [0, -1, i32::MIN] {
            let error = validate(&DetectionParameters::new(max_labels, 50.0), &jpeg()).unwrap_err();
            assert_eq!(error.kind, ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn rejects_confidence_out_of_range() {
        for min_confidence in [-1.0, -0.001, 100.001, 101.0, f32::NAN, f32::INFINITY] {
            let params = DetectionParameters::new(3, min_confidence);
            let error = validate(&params, &jpeg()).unwrap_err();
            assert_eq!(error.kind, ErrorKind::InvalidParameter);
            assert!(!params.is_within_bounds());
        }
    }

    #[test]
    fn rejects_empty_sources() {
        let params = DetectionParameters::new(3, 50.0);
        let sources = [
            ImageSource::bytes(Vec::new()),
            ImageSource::object("", "car.jpg"),
            ImageSource::object("photos", "  "),
            ImageSource::url(""),
        ];

        for source in sources {
            let error = validate(&params, &source).unwrap_err();
            assert_eq!(error.kind, ErrorKind::InvalidParameter, "{source:?}");
        }
    }

    #[test]
    fn parameters_are_checked_before_source() {
        let error = validate(
            &DetectionParameters::new(0, 50.0),
            &ImageSource::bytes(Vec::new()),
        )
        .unwrap_err();

        assert!(error.message_or_kind().contains("maxLabels"));
    }
}
