//! Error types for docpredict-client.
//!
//! None of these errors are retried by the client; each one is terminal for
//! the call that produced it.

use std::path::{Path, PathBuf};

use reqwest::{Method, StatusCode};
use url::Url;

use crate::client::ClientConfigBuilderError;

/// Result type for all client operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required input was missing or malformed; nothing was sent.
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A local file could not be read for upload.
    #[error("Failed to read '{}': {source}", path.display())]
    IoFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service answered with a status outside the success range.
    #[error("{method} {uri} failed with {status}{}", .body.as_deref().map(|b| format!(": {b}")).unwrap_or_default())]
    RemoteCallFailed {
        method: Method,
        uri: Url,
        status: StatusCode,
        reason: String,
        body: Option<String>,
    },

    /// The `Operation-location` header was missing or repeated.
    #[error("Protocol violation from {uri}: {reason}")]
    ProtocolViolation { uri: Url, reason: String },

    /// The remote operation reported a terminal non-success status.
    #[error("Operation at {uri} finished with status '{status}'")]
    OperationFailed { uri: Url, status: String },

    /// A response body did not match the expected JSON shape.
    #[error("Failed to decode response from {uri}: {source}")]
    DecodeFailed {
        uri: Url,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the call.
    #[error("Operation cancelled")]
    Cancelled,

    /// The request could not be sent or its response could not be read.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid client configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create an I/O error for the given file
    pub fn io_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::IoFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a remote call error from a non-success response
    pub fn remote_call_failed(
        method: Method,
        uri: Url,
        status: StatusCode,
        body: impl AsRef<[u8]>,
    ) -> Self {
        let body = body.as_ref();
        Self::RemoteCallFailed {
            method,
            uri,
            status,
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
        }
    }

    /// Create a protocol violation error
    pub fn protocol_violation(uri: Url, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            uri,
            reason: reason.into(),
        }
    }

    /// Create an operation failed error
    pub fn operation_failed(uri: Url, status: impl Into<String>) -> Self {
        Self::OperationFailed {
            uri,
            status: status.into(),
        }
    }

    /// Create a decode error
    pub fn decode_failed(uri: Url, source: serde_json::Error) -> Self {
        Self::DecodeFailed { uri, source }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the call ended because the caller cancelled it.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status of a failed remote call, if this is one.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::RemoteCallFailed { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            _ => None,
        }
    }
}

impl From<ClientConfigBuilderError> for Error {
    fn from(err: ClientConfigBuilderError) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("https://example.com/operations/1").unwrap()
    }

    #[test]
    fn test_remote_call_failed_keeps_body() {
        let err = Error::remote_call_failed(
            Method::GET,
            uri(),
            StatusCode::TOO_MANY_REQUESTS,
            br#"{"error":"slow down"}"#,
        );

        assert_eq!(err.status_code(), Some(StatusCode::TOO_MANY_REQUESTS));
        match &err {
            Error::RemoteCallFailed { reason, body, .. } => {
                assert_eq!(reason, "Too Many Requests");
                assert_eq!(body.as_deref(), Some(r#"{"error":"slow down"}"#));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_remote_call_failed_empty_body() {
        let err = Error::remote_call_failed(Method::POST, uri(), StatusCode::BAD_GATEWAY, b"");
        assert!(matches!(err, Error::RemoteCallFailed { body: None, .. }));
    }

    #[test]
    fn test_is_cancelled() {
        assert!(Error::Cancelled.is_cancelled());
        assert!(!Error::operation_failed(uri(), "Failed").is_cancelled());
    }
}
