//! Per-call prediction switches.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Deployment stage of the served model version.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PublishSlot {
    /// Pre-release model version.
    Staging,
    /// Published model version.
    #[default]
    Production,
}

/// Options controlling what a prediction call asks the service for.
///
/// Passed by value into each prediction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOptions {
    /// Request per-classifier scores.
    pub include_classifier_scores: bool,
    /// Request the `$instance` span data for extracted entities.
    pub include_verbose_extraction: bool,
    /// Ask the service to log the query.
    pub log_query: bool,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            include_classifier_scores: true,
            include_verbose_extraction: true,
            log_query: false,
        }
    }
}

impl PredictionOptions {
    /// Sets whether classifier scores are requested.
    #[must_use]
    pub fn with_classifier_scores(mut self, include: bool) -> Self {
        self.include_classifier_scores = include;
        self
    }

    /// Sets whether verbose extraction data is requested.
    #[must_use]
    pub fn with_verbose_extraction(mut self, include: bool) -> Self {
        self.include_verbose_extraction = include;
        self
    }

    /// Sets whether the service should log the query.
    #[must_use]
    pub fn with_log_query(mut self, log: bool) -> Self {
        self.log_query = log;
        self
    }

    /// Value of the `$expand` query parameter for these options.
    ///
    /// Empty when neither scores nor verbose extraction are requested.
    pub fn expand(&self) -> &'static str {
        match (
            self.include_classifier_scores,
            self.include_verbose_extraction,
        ) {
            (true, true) => "classifier,extractor",
            (true, false) => "classifier",
            (false, true) => "extractor",
            (false, false) => "",
        }
    }
}
