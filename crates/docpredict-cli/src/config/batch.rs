//! Batch input, output and prediction configuration.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Args;
use docpredict_core::{PredictionOptions, PublishSlot};

use crate::TRACING_TARGET_CONFIG;

/// Batch configuration.
///
/// # Environment Variables
///
/// - `DOCPREDICT_APP_ID` - Application to run predictions against
/// - `DOCPREDICT_SLOT` - Publish slot, `staging` or `production` (default: production)
/// - `DOCPREDICT_INPUT_DIR` - Directory scanned for documents
/// - `DOCPREDICT_OUTPUT_DIR` - Directory receiving one JSON file per document (default: output)
/// - `DOCPREDICT_NO_CLASSIFIER_SCORES` - Omit classifier scores
/// - `DOCPREDICT_NO_VERBOSE_EXTRACTION` - Omit extraction text and positions
/// - `DOCPREDICT_LOG_QUERY` - Ask the service to log queries
#[derive(Debug, Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct BatchConfig {
    /// Application id of the published model.
    #[arg(long, env = "DOCPREDICT_APP_ID")]
    pub app_id: String,

    /// Publish slot to run predictions against.
    #[arg(long, env = "DOCPREDICT_SLOT", default_value_t = PublishSlot::Production)]
    pub slot: PublishSlot,

    /// Directory scanned for documents to convert.
    #[arg(long, env = "DOCPREDICT_INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Directory receiving `<file name>.json` for every processed document.
    #[arg(long, env = "DOCPREDICT_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Omit classifier scores from predictions.
    #[arg(long, env = "DOCPREDICT_NO_CLASSIFIER_SCORES")]
    pub no_classifier_scores: bool,

    /// Omit extraction text and positions from predictions.
    #[arg(long, env = "DOCPREDICT_NO_VERBOSE_EXTRACTION")]
    pub no_verbose_extraction: bool,

    /// Ask the service to log prediction queries.
    #[arg(long, env = "DOCPREDICT_LOG_QUERY")]
    pub log_query: bool,
}

impl BatchConfig {
    /// Prediction options selected by the flags.
    pub fn options(&self) -> PredictionOptions {
        PredictionOptions::default()
            .with_classifier_scores(!self.no_classifier_scores)
            .with_verbose_extraction(!self.no_verbose_extraction)
            .with_log_query(self.log_query)
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(anyhow!("Application id must not be empty"));
        }

        if self.input_dir == self.output_dir {
            return Err(anyhow!(
                "Input and output directories must differ, both are '{}'",
                self.input_dir.display()
            ));
        }

        Ok(())
    }

    /// Logs the configuration.
    pub fn log(&self) {
        let options = self.options();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            app_id = %self.app_id,
            slot = %self.slot,
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            expand = options.expand(),
            log_query = options.log_query,
            "Batch configuration"
        );
    }
}
