//! Raw prediction payload and its mapping to [`PredictionResult`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode_entities;
use crate::types::PredictionResult;

/// The `prediction` object returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrediction {
    /// Classifiers that fired, in service order.
    #[serde(default)]
    pub positive_classifiers: Option<Vec<String>>,
    /// Every evaluated classifier keyed by name.
    #[serde(default)]
    pub classifiers: Option<BTreeMap<String, RawClassifier>>,
    /// Entity structure, decoded by [`decode_entities`].
    #[serde(default)]
    pub extractors: Option<Value>,
}

/// Per-classifier data inside [`RawPrediction::classifiers`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClassifier {
    /// Present only when scores were requested.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Maps a raw prediction payload to the public result.
///
/// Classifiers without a score are dropped.
pub fn map_prediction(raw: RawPrediction) -> PredictionResult {
    let positive_classifiers = raw.positive_classifiers.unwrap_or_default();

    let classifier_scores = raw
        .classifiers
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, classifier)| classifier.score.map(|score| (name, score)))
        .collect();

    let extractions = raw
        .extractors
        .as_ref()
        .map(decode_entities)
        .unwrap_or_default();

    PredictionResult::new(positive_classifiers, classifier_scores, extractions)
}
