//! Normalized detection output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TRACING_TARGET;

/// A single detected label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Label name as reported by the provider.
    pub name: String,
    /// Provider confidence in percent.
    pub confidence: f32,
}

impl LabelEntry {
    /// Creates a label entry.
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// Label name to confidence mapping returned by a successful detection.
///
/// Names are unique. When a provider reports the same name twice the later
/// confidence replaces the earlier one, keeping the position of the first
/// occurrence so serialization stays deterministic.
///
/// Serializes as `{"labels":[{"name":"Car","confidence":92.1}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LabelList")]
pub struct DetectionResult {
    labels: Vec<LabelEntry>,
}

#[derive(Deserialize)]
struct LabelList {
    labels: Vec<LabelEntry>,
}

impl From<LabelList> for DetectionResult {
    fn from(list: LabelList) -> Self {
        Self::from_labels(list.labels)
    }
}

impl DetectionResult {
    /// Builds a result from provider labels, copying names and confidences
    /// verbatim.
    pub fn from_labels(labels: impl IntoIterator<Item = LabelEntry>) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<LabelEntry> = Vec::new();

        for label in labels {
            match positions.get(&label.name) {
                Some(&index) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        label = %label.name,
                        previous = unique[index].confidence,
                        confidence = label.confidence,
                        "Duplicate label replaced"
                    );
                    unique[index].confidence = label.confidence;
                }
                None => {
                    positions.insert(label.name.clone(), unique.len());
                    unique.push(label);
                }
            }
        }

        Self { labels: unique }
    }

    /// Labels in provider order.
    pub fn labels(&self) -> &[LabelEntry] {
        &self.labels
    }

    /// Number of labels in the mapping.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if no label was detected.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Confidence of the named label, if present.
    pub fn confidence(&self, name: &str) -> Option<f32> {
        self.labels
            .iter()
            .find(|label| label.name == name)
            .map(|label| label.confidence)
    }

    /// Returns true if the named label is present.
    pub fn contains(&self, name: &str) -> bool {
        self.confidence(name).is_some()
    }

    /// Iterates over `(name, confidence)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.labels
            .iter()
            .map(|label| (label.name.as_str(), label.confidence))
    }

    /// Copies the labels into a name to confidence map.
    pub fn to_map(&self) -> HashMap<String, f32> {
        self.labels
            .iter()
            .map(|label| (label.name.clone(), label.confidence))
            .collect()
    }

    /// Serializes the result into its JSON contract.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Consumes the result and returns its labels.
    pub fn into_labels(self) -> Vec<LabelEntry> {
        self.labels
    }
}

impl FromIterator<LabelEntry> for DetectionResult {
    fn from_iter<I: IntoIterator<Item = LabelEntry>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_scenario_body() {
        let result = DetectionResult::from_labels([
            LabelEntry::new("Car", 92.1),
            LabelEntry::new("Vehicle", 81.0),
        ]);

        assert_eq!(result.label_count(), 2);
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"labels":[{"name":"Car","confidence":92.1},{"name":"Vehicle","confidence":81.0}]}"#
        );
    }

    #[test]
    fn empty_result_is_valid_json() {
        let result = DetectionResult::default();
        assert!(result.is_empty());
        assert_eq!(result.to_json().unwrap(), r#"{"labels":[]}"#);

        let parsed: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(parsed["labels"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn duplicate_names_last_one_wins() {
        let result = DetectionResult::from_labels([
            LabelEntry::new("Car", 70.0),
            LabelEntry::new("Wheel", 88.5),
            LabelEntry::new("Car", 95.5),
        ]);

        assert_eq!(result.label_count(), 2);
        assert_eq!(result.confidence("Car"), Some(95.5));
        assert_eq!(result.labels()[0].name, "Car");
        assert_eq!(result.labels()[1].name, "Wheel");
    }

    #[test]
    fn json_round_trip_preserves_label_set() {
        let original = DetectionResult::from_labels([
            LabelEntry::new("Car", 92.1),
            LabelEntry::new("Tire", 64.25),
            LabelEntry::new("Machine", 50.000_1),
            LabelEntry::new("Road \"sign\"", 99.99),
        ]);

        let json = original.to_json().unwrap();
        let parsed: DetectionResult = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.to_map(), original.to_map());
        assert_eq!(parsed.label_count(), original.label_count());
    }

    #[test]
    fn confidence_is_numeric() {
        let result = DetectionResult::from_labels([LabelEntry::new("Car", 92.1)]);
        let value: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert!(value["labels"][0]["confidence"].is_number());
        assert!(result.contains("Car"));
        assert!(!result.contains("Boat"));
    }
}
