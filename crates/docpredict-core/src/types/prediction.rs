//! Normalized prediction result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ExtractionInstance, Walk};

/// Outcome of a single text prediction.
///
/// Built once by [`map_prediction`](crate::map_prediction) and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    positive_classifiers: Vec<String>,
    classifier_scores: BTreeMap<String, f64>,
    extractions: Vec<ExtractionInstance>,
}

impl PredictionResult {
    /// Creates a result from its parts.
    pub fn new(
        positive_classifiers: Vec<String>,
        classifier_scores: BTreeMap<String, f64>,
        extractions: Vec<ExtractionInstance>,
    ) -> Self {
        Self {
            positive_classifiers,
            classifier_scores,
            extractions,
        }
    }

    /// Classifiers that fired for the query, in service order.
    pub fn positive_classifiers(&self) -> &[String] {
        &self.positive_classifiers
    }

    /// Scores of every classifier the service reported a score for.
    pub fn classifier_scores(&self) -> &BTreeMap<String, f64> {
        &self.classifier_scores
    }

    /// Score of one classifier, if it was reported.
    pub fn score(&self, classifier: &str) -> Option<f64> {
        self.classifier_scores.get(classifier).copied()
    }

    /// Top-level extracted entities.
    pub fn extractions(&self) -> &[ExtractionInstance] {
        &self.extractions
    }

    /// Iterates over every extracted entity at any depth.
    pub fn walk(&self) -> Walk<'_> {
        Walk::over(&self.extractions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_spans_all_roots() {
        let result = PredictionResult::new(
            vec!["invoice".into()],
            BTreeMap::from([("invoice".to_owned(), 0.93)]),
            vec![
                ExtractionInstance::composite("total", vec![ExtractionInstance::leaf("amount", "12")]),
                ExtractionInstance::leaf("date", "2020-01-01"),
            ],
        );

        let names: Vec<_> = result.walk().map(ExtractionInstance::entity_name).collect();
        assert_eq!(names, ["total", "amount", "date"]);
        assert_eq!(result.score("invoice"), Some(0.93));
        assert_eq!(result.score("receipt"), None);
    }
}
