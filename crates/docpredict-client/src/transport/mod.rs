//! HTTP transport for the prediction service.
//!
//! - [`TransportProvider`]: sends one request and returns the raw response
//! - [`Transport`]: shared wrapper adding cancellation, status classification
//!   and structured logging on top of any provider
//! - [`ReqwestTransport`]: the provider used against the real service

mod connect;
mod request;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod scripted;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

pub use connect::{ReqwestTransport, SUBSCRIPTION_KEY_HEADER};
pub use request::{RequestBody, TransportRequest, TransportResponse};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use scripted::{RecordedRequest, ScriptedTransport};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::TRACING_TARGET_TRANSPORT;
use crate::error::{Error, Result};

/// Core trait for sending requests to the service.
///
/// Implementations perform no status checks; [`Transport`] classifies the
/// response. Dropping the returned future must release every resource
/// held by the request.
#[async_trait::async_trait]
pub trait TransportProvider: Send + Sync {
    /// Sends a request and reads the full response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Transport wrapper with cancellation and observability.
///
/// The provider is wrapped in `Arc` for cheap cloning and is never mutated
/// after construction, so one transport can serve concurrent calls.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<dyn TransportProvider>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a new transport wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: TransportProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Issues a `GET` and returns the successful response.
    pub async fn get(&self, uri: &Url, cancel: &CancellationToken) -> Result<TransportResponse> {
        self.execute(TransportRequest::get(uri.clone()), cancel)
            .await
    }

    /// Issues a `POST` with the given body and returns the successful response.
    pub async fn post(
        &self,
        uri: &Url,
        body: RequestBody,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        self.execute(TransportRequest::post(uri.clone(), body), cancel)
            .await
    }

    /// Sends a request, aborting as soon as `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] on cancellation and
    /// [`Error::RemoteCallFailed`] for any non-success status.
    pub async fn execute(
        &self,
        request: TransportRequest,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        let started_at = Instant::now();
        let method = request.method().clone();
        let uri = request.uri().clone();

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            method = %method,
            uri = %uri,
            "Sending request"
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            result = self.inner.send(request) => result,
        };
        let elapsed = started_at.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(
                    target: TRACING_TARGET_TRANSPORT,
                    method = %method,
                    uri = %uri,
                    error = %err,
                    elapsed_ms = elapsed.as_millis(),
                    "Request did not complete"
                );
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: TRACING_TARGET_TRANSPORT,
                method = %method,
                uri = %uri,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis(),
                "Request failed"
            );
            return Err(Error::remote_call_failed(
                method,
                uri,
                status,
                response.body(),
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        Ok(response)
    }
}
