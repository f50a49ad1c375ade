//! Batch conversion and prediction.
//!
//! Every supported document in the input directory is converted to text
//! chunks, each non-blank chunk is predicted, and the predictions are written
//! as a JSON array to `<output dir>/<file name>.json`. A failing document is
//! logged and skipped; cancellation stops the batch.

mod discover;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use docpredict_client::PredictionClient;
use docpredict_core::{PredictionOptions, PredictionResult, PublishSlot};
use tokio_util::sync::CancellationToken;

use self::discover::discover;
use crate::TRACING_TARGET_BATCH;
use crate::config::BatchConfig;

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents whose predictions were written.
    pub processed: Vec<PathBuf>,
    /// Documents that failed.
    pub failed: Vec<PathBuf>,
    /// Whether the run was cut short by cancellation.
    pub cancelled: bool,
}

impl BatchReport {
    /// Returns `true` if every document was processed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

/// Drives conversion and prediction over a directory of documents.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    client: PredictionClient,
    app_id: String,
    slot: PublishSlot,
    options: PredictionOptions,
    output_dir: PathBuf,
}

impl BatchRunner {
    /// Creates a runner from the batch configuration.
    pub fn new(client: PredictionClient, config: &BatchConfig) -> Self {
        Self {
            client,
            app_id: config.app_id.clone(),
            slot: config.slot,
            options: config.options(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Processes every supported document in `input_dir`, one at a time.
    ///
    /// # Errors
    ///
    /// Fails only if the input directory cannot be listed or the output
    /// directory cannot be created; per-document failures land in the report.
    pub async fn run(
        &self,
        input_dir: &Path,
        cancel: &CancellationToken,
    ) -> anyhow::Result<BatchReport> {
        let documents = discover(input_dir).await?;
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create output directory '{}'",
                    self.output_dir.display()
                )
            })?;

        tracing::info!(
            target: TRACING_TARGET_BATCH,
            input_dir = %input_dir.display(),
            documents = documents.len(),
            "Starting batch"
        );

        let mut report = BatchReport::default();
        for path in documents {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let started_at = Instant::now();
            match self.process(&path, cancel).await {
                Ok(output) => {
                    tracing::info!(
                        target: TRACING_TARGET_BATCH,
                        document = %path.display(),
                        output = %output.display(),
                        elapsed_ms = started_at.elapsed().as_millis(),
                        "Document processed"
                    );
                    report.processed.push(path);
                }
                Err(_) if cancel.is_cancelled() => {
                    tracing::warn!(
                        target: TRACING_TARGET_BATCH,
                        document = %path.display(),
                        "Document interrupted by cancellation"
                    );
                    report.cancelled = true;
                    break;
                }
                Err(error) => {
                    tracing::error!(
                        target: TRACING_TARGET_BATCH,
                        document = %path.display(),
                        error = %format!("{error:#}"),
                        "Document failed"
                    );
                    report.failed.push(path);
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET_BATCH,
            processed = report.processed.len(),
            failed = report.failed.len(),
            cancelled = report.cancelled,
            "Batch finished"
        );

        Ok(report)
    }

    /// Converts and predicts one document, returning the written output path.
    async fn process(&self, path: &Path, cancel: &CancellationToken) -> anyhow::Result<PathBuf> {
        let chunks = self
            .client
            .convert_to_text(path, cancel)
            .await
            .context("conversion failed")?;

        let mut results: Vec<PredictionResult> = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.trim().is_empty() {
                tracing::debug!(
                    target: TRACING_TARGET_BATCH,
                    document = %path.display(),
                    chunk = index,
                    "Skipping blank chunk"
                );
                continue;
            }

            let result = self
                .client
                .predict(chunk, &self.app_id, self.slot, self.options, cancel)
                .await
                .with_context(|| format!("prediction failed for chunk {index}"))?;
            results.push(result);
        }

        let output = self.output_path(path);
        let json = serde_json::to_vec_pretty(&results).context("failed to serialize predictions")?;
        tokio::fs::write(&output, json)
            .await
            .with_context(|| format!("failed to write '{}'", output.display()))?;

        Ok(output)
    }

    /// `<output dir>/<file name>.json`, keeping the original extension.
    fn output_path(&self, document: &Path) -> PathBuf {
        let mut name = document.file_name().unwrap_or_default().to_os_string();
        name.push(".json");
        self.output_dir.join(name)
    }
}
