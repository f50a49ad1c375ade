//! Long-running operation poller.
//!
//! Drives one remote operation through its lifecycle:
//!
//! ```text
//! POST start ──► Operation-location ──► GET status ─┬─ NotStarted/Running ──► wait ──┐
//!                                          ▲        │                              │
//!                                          └────────┼──────────────────────────────┘
//!                                                   ├─ Succeeded ──► GET Operation-location ──► result
//!                                                   └─ anything else ──► OperationFailed
//! ```
//!
//! Polls are strictly sequential. Every request and every wait can be cut
//! short by the caller's [`CancellationToken`].

mod status;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

pub use self::status::OperationStatus;
use self::status::StatusBody;
use crate::TRACING_TARGET_POLLER;
use crate::error::{Error, Result};
use crate::transport::{RequestBody, Transport, TransportResponse};

/// Response header pointing at the operation status or its result.
pub const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// Default wait between two status polls.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(1);

/// Location of a running or completed remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    location: Url,
}

impl OperationHandle {
    /// Wraps an operation location.
    pub fn new(location: Url) -> Self {
        Self { location }
    }

    /// The operation location.
    pub fn location(&self) -> &Url {
        &self.location
    }
}

/// Start, poll and fetch state machine shared by every operation kind.
#[derive(Debug, Clone)]
pub struct LroPoller {
    transport: Transport,
    interval: Duration,
}

impl LroPoller {
    /// Creates a poller waiting `interval` between status polls.
    pub fn new(transport: Transport, interval: Duration) -> Self {
        Self {
            transport,
            interval,
        }
    }

    /// Wait between two status polls.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts an operation, polls it to completion and fetches its result.
    ///
    /// # Errors
    ///
    /// Propagates every transport, protocol, decode and cancellation error;
    /// returns [`Error::OperationFailed`] if the operation ends in any state
    /// other than succeeded.
    pub async fn run<T>(&self, uri: &Url, body: RequestBody, cancel: &CancellationToken) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let handle = self.start(uri, body, cancel).await?;
        self.wait_for_result(&handle, cancel).await
    }

    /// Posts the initiating request and returns the operation handle.
    pub async fn start(
        &self,
        uri: &Url,
        body: RequestBody,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle> {
        let response = self.transport.post(uri, body, cancel).await?;
        let handle = operation_location(&response)?;

        tracing::debug!(
            target: TRACING_TARGET_POLLER,
            uri = %uri,
            location = %handle.location(),
            "Operation started"
        );

        Ok(handle)
    }

    /// Polls an operation until it is terminal, then fetches the result.
    pub async fn wait_for_result<T>(
        &self,
        handle: &OperationHandle,
        cancel: &CancellationToken,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let result = self.poll_until_done(handle, cancel).await?;
        let response = self.transport.get(result.location(), cancel).await?;
        response.json()
    }

    /// Polls the status location; returns the result location on success.
    async fn poll_until_done(
        &self,
        handle: &OperationHandle,
        cancel: &CancellationToken,
    ) -> Result<OperationHandle> {
        let mut polls: u32 = 0;

        loop {
            let response = self.transport.get(handle.location(), cancel).await?;
            polls += 1;

            let body: StatusBody = response.json()?;
            match OperationStatus::parse(&body.status) {
                OperationStatus::NotStarted | OperationStatus::Running => {
                    tracing::trace!(
                        target: TRACING_TARGET_POLLER,
                        location = %handle.location(),
                        status = %body.status,
                        polls,
                        "Operation pending"
                    );
                    self.delay(cancel).await?;
                }
                OperationStatus::Succeeded => {
                    let result = operation_location(&response)?;
                    tracing::debug!(
                        target: TRACING_TARGET_POLLER,
                        location = %handle.location(),
                        result = %result.location(),
                        polls,
                        "Operation succeeded"
                    );
                    return Ok(result);
                }
                OperationStatus::Failed(status) => {
                    tracing::warn!(
                        target: TRACING_TARGET_POLLER,
                        location = %handle.location(),
                        status = %status,
                        polls,
                        "Operation failed"
                    );
                    return Err(Error::operation_failed(handle.location().clone(), status));
                }
            }
        }
    }

    async fn delay(&self, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(
                    target: TRACING_TARGET_POLLER,
                    "Polling cancelled"
                );
                Err(Error::Cancelled)
            }
            _ = tokio::time::sleep(self.interval) => Ok(()),
        }
    }
}

/// Reads the single `Operation-location` header of a response.
///
/// Relative locations are resolved against the request target.
fn operation_location(response: &TransportResponse) -> Result<OperationHandle> {
    let values: Vec<_> = response
        .headers()
        .get_all(OPERATION_LOCATION_HEADER)
        .iter()
        .collect();

    let [value] = values.as_slice() else {
        return Err(Error::protocol_violation(
            response.uri().clone(),
            format!(
                "expected exactly one Operation-location header, found {}",
                values.len()
            ),
        ));
    };

    let location = value
        .to_str()
        .ok()
        .and_then(|value| response.uri().join(value.trim()).ok())
        .ok_or_else(|| {
            Error::protocol_violation(
                response.uri().clone(),
                "Operation-location header is not a valid URI",
            )
        })?;

    Ok(OperationHandle::new(location))
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde::Deserialize;
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::transport::ScriptedTransport;

    const START: &str = "https://svc.example.com/start";
    const STATUS: &str = "https://svc.example.com/operations/1";
    const RESULT: &str = "https://svc.example.com/operations/1/result";

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        value: u32,
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn started(script: ScriptedTransport) -> ScriptedTransport {
        script.reply_raw(StatusCode::ACCEPTED, &[("Operation-location", STATUS)], "")
    }

    fn poller(script: &ScriptedTransport) -> LroPoller {
        LroPoller::new(Transport::new(script.clone()), DEFAULT_POLLING_INTERVAL)
    }

    async fn run(poller: &LroPoller, cancel: &CancellationToken) -> Result<Answer> {
        poller
            .run(&url(START), RequestBody::json(json!({"query": "q"})), cancel)
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_succeeded_then_fetches() {
        let script = started(ScriptedTransport::new())
            .reply(StatusCode::OK, &[], json!({"status": "NotStarted"}))
            .reply(StatusCode::OK, &[], json!({"status": "Running"}))
            .reply(
                StatusCode::OK,
                &[("Operation-location", RESULT)],
                json!({"status": "Succeeded"}),
            )
            .reply(StatusCode::OK, &[], json!({"value": 42}));

        let started_at = Instant::now();
        let answer = run(&poller(&script), &CancellationToken::new()).await.unwrap();

        assert_eq!(answer, Answer { value: 42 });
        let elapsed = started_at.elapsed();
        assert!(elapsed >= DEFAULT_POLLING_INTERVAL * 2);
        assert!(elapsed < DEFAULT_POLLING_INTERVAL * 3);

        let uris: Vec<_> = script.requests().into_iter().map(|r| r.uri.to_string()).collect();
        assert_eq!(uris, [START, STATUS, STATUS, STATUS, RESULT]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_uses_location_from_succeeded_poll() {
        let script = started(ScriptedTransport::new())
            .reply(
                StatusCode::OK,
                &[("Operation-location", "/elsewhere/result")],
                json!({"status": "succeeded"}),
            )
            .reply(StatusCode::OK, &[], json!({"value": 7}));

        run(&poller(&script), &CancellationToken::new()).await.unwrap();

        let last = script.requests().pop().unwrap();
        assert_eq!(last.uri.as_str(), "https://svc.example.com/elsewhere/result");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_status_skips_fetch() {
        for status in ["Failed", "failed", "Cancelled", "PartiallySucceeded"] {
            let script = started(ScriptedTransport::new())
                .reply(StatusCode::OK, &[], json!({"status": status}))
                .reply(StatusCode::OK, &[], json!({"value": 1}));

            let err = run(&poller(&script), &CancellationToken::new()).await.unwrap_err();

            match err {
                Error::OperationFailed { uri, status: got } => {
                    assert_eq!(uri.as_str(), STATUS);
                    assert_eq!(got, status);
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(script.requests().len(), 2);
            assert_eq!(script.remaining(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_delay() {
        let script = started(ScriptedTransport::new())
            .reply(StatusCode::OK, &[], json!({"status": "Running"}))
            .reply(StatusCode::OK, &[], json!({"status": "Running"}));
        let poller = poller(&script);
        let cancel = CancellationToken::new();

        let started_at = Instant::now();
        let canceller = cancel.clone();
        let (result, ()) = tokio::join!(run(&poller, &cancel), async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            canceller.cancel();
        });

        assert!(result.unwrap_err().is_cancelled());
        assert!(started_at.elapsed() < DEFAULT_POLLING_INTERVAL);
        assert_eq!(script.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_location_on_start() {
        let script = ScriptedTransport::new().reply_raw(StatusCode::ACCEPTED, &[], "");

        let err = run(&poller(&script), &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(err, Error::ProtocolViolation { .. }));
        assert_eq!(script.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_location_on_succeeded_poll() {
        let script = started(ScriptedTransport::new()).reply(
            StatusCode::OK,
            &[("Operation-location", RESULT), ("Operation-location", RESULT)],
            json!({"status": "Succeeded"}),
        );

        let err = run(&poller(&script), &CancellationToken::new()).await.unwrap_err();

        match err {
            Error::ProtocolViolation { uri, reason } => {
                assert_eq!(uri.as_str(), STATUS);
                assert!(reason.contains("found 2"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_failure_at_each_step() {
        let scripts = [
            ScriptedTransport::new().reply_raw(StatusCode::UNAUTHORIZED, &[], "bad key"),
            started(ScriptedTransport::new()).reply_raw(
                StatusCode::SERVICE_UNAVAILABLE,
                &[],
                "try later",
            ),
            started(ScriptedTransport::new())
                .reply(
                    StatusCode::OK,
                    &[("Operation-location", RESULT)],
                    json!({"status": "Succeeded"}),
                )
                .reply_raw(StatusCode::GONE, &[], "expired"),
        ];
        let expected = [
            (StatusCode::UNAUTHORIZED, "bad key"),
            (StatusCode::SERVICE_UNAVAILABLE, "try later"),
            (StatusCode::GONE, "expired"),
        ];

        for (script, (code, text)) in scripts.into_iter().zip(expected) {
            let err = run(&poller(&script), &CancellationToken::new()).await.unwrap_err();
            match err {
                Error::RemoteCallFailed { status, body, .. } => {
                    assert_eq!(status, code);
                    assert_eq!(body.as_deref(), Some(text));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_status_body() {
        let script =
            started(ScriptedTransport::new()).reply(StatusCode::OK, &[], json!({"state": "Running"}));

        let err = run(&poller(&script), &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(err, Error::DecodeFailed { .. }));
    }
}
