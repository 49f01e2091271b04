//! Detection parameter defaults.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use vislabel_core::DetectionParameters;

/// Default `maxLabels` when a request omits it.
pub const DEFAULT_MAX_LABELS: i32 = 10;

/// Default `minConfidence` when a request omits it.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 55.0;

/// Parameter values applied when a request leaves them out.
///
/// The values are not validated here; out of range defaults are rejected
/// per request like any other invalid parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct DetectionDefaults {
    /// Maximum number of labels returned when the request does not say.
    #[cfg_attr(
        feature = "config",
        arg(
            id = "default_max_labels",
            long = "default-max-labels",
            env = "DEFAULT_MAX_LABELS",
            default_value_t = DEFAULT_MAX_LABELS
        )
    )]
    pub max_labels: i32,

    /// Minimum confidence, in percent, used when the request does not say.
    #[cfg_attr(
        feature = "config",
        arg(
            id = "default_min_confidence",
            long = "default-min-confidence",
            env = "DEFAULT_MIN_CONFIDENCE",
            default_value_t = DEFAULT_MIN_CONFIDENCE
        )
    )]
    pub min_confidence: f32,
}

impl Default for DetectionDefaults {
    fn default() -> Self {
        Self {
            max_labels: DEFAULT_MAX_LABELS,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl DetectionDefaults {
    /// Creates defaults from explicit values.
    pub const fn new(max_labels: i32, min_confidence: f32) -> Self {
        Self {
            max_labels,
            min_confidence,
        }
    }

    /// Resolves request values against these defaults.
    pub fn parameters(
        &self,
        max_labels: Option<i32>,
        min_confidence: Option<f32>,
    ) -> DetectionParameters {
        DetectionParameters::new(
            max_labels.unwrap_or(self.max_labels),
            min_confidence.unwrap_or(self.min_confidence),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_values_use_defaults() {
        let defaults = DetectionDefaults::default();
        assert_eq!(
            defaults.parameters(None, None),
            DetectionParameters::new(10, 55.0)
        );
        assert_eq!(
            defaults.parameters(Some(3), None),
            DetectionParameters::new(3, 55.0)
        );
        assert_eq!(
            defaults.parameters(None, Some(0.0)),
            DetectionParameters::new(10, 0.0)
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn parses_from_command_line() {
        use clap::Parser;

        #[derive(Parser)]
        struct TestCli {
            #[clap(flatten)]
            defaults: DetectionDefaults,
        }

        let cli = TestCli::parse_from([
            "test",
            "--default-max-labels",
            "5",
            "--default-min-confidence",
            "70",
        ]);
        assert_eq!(cli.defaults, DetectionDefaults::new(5, 70.0));
    }
}
