//! Scripted in-memory transport provider for testing.
//!
//! Replies are handed out in the order they were scripted and every request
//! is recorded, so tests can assert on exactly what the client sent.
//!
//! Only available with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! docpredict-client = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use url::Url;

use super::{RequestBody, TransportProvider, TransportRequest, TransportResponse};
use crate::error::Result;

/// A request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Request method.
    pub method: Method,
    /// Request target.
    pub uri: Url,
    /// Request body, if any.
    pub body: Option<RequestBody>,
}

#[derive(Debug, Clone)]
enum Reply {
    Respond {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    Hang,
}

#[derive(Debug, Default)]
struct ScriptedState {
    replies: VecDeque<Reply>,
    requests: Vec<RecordedRequest>,
}

/// Transport provider that answers from a fixed script.
///
/// Clones share the same script and request log. Once the script is
/// exhausted every request is answered with `500 Internal Server Error`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a JSON reply.
    #[must_use]
    pub fn reply(self, status: StatusCode, headers: &[(&str, &str)], body: serde_json::Value) -> Self {
        self.reply_raw(status, headers, body.to_string())
    }

    /// Appends a reply with a raw body.
    #[must_use]
    pub fn reply_raw(
        self,
        status: StatusCode,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> Self {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(*name),
                HeaderValue::try_from(*value),
            ) {
                header_map.append(name, value);
            }
        }

        self.push(Reply::Respond {
            status,
            headers: header_map,
            body: body.into(),
        })
    }

    /// Appends a reply that never arrives.
    #[must_use]
    pub fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Number of scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock().replies.len()
    }

    fn push(self, reply: Reply) -> Self {
        self.lock().replies.push_back(reply);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TransportProvider for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let (method, uri, body) = request.into_parts();

        let reply = {
            let mut state = self.lock();
            state.requests.push(RecordedRequest {
                method,
                uri: uri.clone(),
                body,
            });
            state.replies.pop_front()
        };

        match reply {
            Some(Reply::Respond {
                status,
                headers,
                body,
            }) => Ok(TransportResponse::new(uri, status, headers, body)),
            Some(Reply::Hang) => std::future::pending().await,
            None => Ok(TransportResponse::new(
                uri,
                StatusCode::INTERNAL_SERVER_ERROR,
                HeaderMap::new(),
                "no scripted reply left",
            )),
        }
    }
}
