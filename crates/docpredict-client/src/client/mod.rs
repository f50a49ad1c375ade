//! Prediction client.
//!
//! [`PredictionClient`] drives the two operations the service offers through
//! the shared [`LroPoller`]. They differ only in the initiating request and
//! the shape of the final payload.

mod config;
mod endpoint;

use std::path::Path;
use std::sync::Arc;

use docpredict_core::{
    PredictionOptions, PredictionResult, PublishSlot, RawPrediction, map_prediction,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tokio_util::sync::CancellationToken;

pub use self::config::{
    ClientConfig, ClientConfigBuilder, ClientConfigBuilderError, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_TIMEOUT,
};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};
use crate::poller::LroPoller;
use crate::transport::{ReqwestTransport, RequestBody, Transport, TransportProvider};

/// Multipart field carrying the uploaded document.
const DOCUMENT_FIELD: &str = "document";

/// Final payload of a conversion operation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertedDocument {
    /// The service encodes the chunk array as a JSON string.
    #[serde(deserialize_with = "json_string")]
    document_text: Vec<String>,
}

/// Final payload of a prediction operation.
#[derive(Debug, Deserialize)]
struct PredictedText {
    prediction: RawPrediction,
}

/// Decodes a string field that itself contains JSON.
fn json_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let encoded = String::deserialize(deserializer)?;
    serde_json::from_str(&encoded).map_err(serde::de::Error::custom)
}

struct PredictionClientInner {
    poller: LroPoller,
    config: ClientConfig,
}

/// Client for the document conversion and text prediction operations.
///
/// Cloning is cheap; clones share one connection pool. Calls may run
/// concurrently since nothing is mutated after construction.
///
/// # Examples
///
/// ```rust,ignore
/// use docpredict_client::{ClientConfig, PredictionClient};
/// use docpredict_core::{PredictionOptions, PublishSlot};
/// use tokio_util::sync::CancellationToken;
///
/// let config = ClientConfig::builder()
///     .with_endpoint("https://westus.api.cognitive.microsoft.com")?
///     .with_subscription_key("your-key")
///     .build()?;
///
/// let client = PredictionClient::new(config)?;
/// let result = client
///     .predict("Jane Doe, 1 Main St", "app-id", PublishSlot::Staging,
///              PredictionOptions::default(), &CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct PredictionClient {
    inner: Arc<PredictionClientInner>,
}

impl std::fmt::Debug for PredictionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl PredictionClient {
    /// Creates a client talking to the service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let provider = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, provider))
    }

    /// Creates a client sending its requests through `provider`.
    pub fn with_transport<P>(config: ClientConfig, provider: P) -> Self
    where
        P: TransportProvider + 'static,
    {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint,
            polling_interval_ms = config.polling_interval.as_millis(),
            "Creating prediction client"
        );

        let poller = LroPoller::new(Transport::new(provider), config.polling_interval);
        let inner = PredictionClientInner { poller, config };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Uploads a document and returns the text chunks extracted from it.
    ///
    /// The file name, not the path, is sent with the upload; its extension
    /// tells the service which format to expect. Chunks are returned exactly
    /// as the service produced them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a path without a file name,
    /// [`Error::IoFailed`] if the file cannot be read, and any error of the
    /// underlying operation.
    pub async fn convert_to_text(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::invalid_argument(format!("'{}' does not name a file", path.display()))
            })?
            .to_owned();

        let uri = endpoint::convert_uri(&self.inner.config.endpoint)?;
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io_failed(path, e))?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            file_name = %file_name,
            size = content.len(),
            "Converting document"
        );

        let body = RequestBody::file(DOCUMENT_FIELD, file_name, content);
        let converted: ConvertedDocument = self.inner.poller.run(&uri, body, cancel).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            path = %path.display(),
            chunks = converted.document_text.len(),
            "Document converted"
        );

        Ok(converted.document_text)
    }

    /// Runs a prediction on one chunk of text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for empty text or an empty
    /// application id, and any error of the underlying operation.
    pub async fn predict(
        &self,
        text: &str,
        app_id: &str,
        slot: PublishSlot,
        options: PredictionOptions,
        cancel: &CancellationToken,
    ) -> Result<PredictionResult> {
        if text.is_empty() {
            return Err(Error::invalid_argument("prediction text must not be empty"));
        }
        if app_id.trim().is_empty() {
            return Err(Error::invalid_argument("application id must not be empty"));
        }

        let uri = endpoint::predict_uri(&self.inner.config.endpoint, app_id, slot, options)?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            app_id,
            slot = %slot,
            expand = options.expand(),
            chars = text.chars().count(),
            "Predicting text"
        );

        let body = RequestBody::json(json!({ "query": text }));
        let predicted: PredictedText = self.inner.poller.run(&uri, body, cancel).await?;
        let result = map_prediction(predicted.prediction);

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            app_id,
            positive_classifiers = result.positive_classifiers().len(),
            extractions = result.extractions().len(),
            "Prediction completed"
        );

        Ok(result)
    }
}
