//! Per-request detection parameters.

use serde::{Deserialize, Serialize};

/// Upper and lower bounds a detection request asks the provider to honor.
///
/// Values are stored as received; [`validate`] enforces `max_labels >= 1` and
/// `0 <= min_confidence <= 100` before anything leaves the process.
///
/// [`validate`]: super::validate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionParameters {
    /// Maximum number of labels to return.
    pub max_labels: i32,
    /// Minimum confidence, in percent, a label needs to be returned.
    pub min_confidence: f32,
}

impl DetectionParameters {
    /// Lowest accepted confidence floor.
    pub const MIN_CONFIDENCE: f32 = 0.0;
    /// Highest accepted confidence floor.
    pub const MAX_CONFIDENCE: f32 = 100.0;

    /// Creates parameters from raw caller values.
    pub const fn new(max_labels: i32, min_confidence: f32) -> Self {
        Self {
            max_labels,
            min_confidence,
        }
    }

    /// Returns true if both bounds are within range.
    pub fn is_within_bounds(&self) -> bool {
        self.max_labels >= 1
            && (Self::MIN_CONFIDENCE..=Self::MAX_CONFIDENCE).contains(&self.min_confidence)
    }
}
