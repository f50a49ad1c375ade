//! Transport-level request and response values.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document sent as `application/json`.
    Json(serde_json::Value),
    /// Single-part `multipart/form-data` file upload.
    File {
        /// Form field name.
        field: String,
        /// File name reported to the service, without directories.
        file_name: String,
        /// File contents.
        content: Bytes,
    },
}

impl RequestBody {
    /// Creates a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// Creates a single-file multipart body.
    pub fn file(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self::File {
            field: field.into(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Request handed to a [`TransportProvider`](super::TransportProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    method: Method,
    uri: Url,
    body: Option<RequestBody>,
}

impl TransportRequest {
    /// Creates a `GET` request.
    pub fn get(uri: Url) -> Self {
        Self {
            method: Method::GET,
            uri,
            body: None,
        }
    }

    /// Creates a `POST` request with a body.
    pub fn post(uri: Url, body: RequestBody) -> Self {
        Self {
            method: Method::POST,
            uri,
            body: Some(body),
        }
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request target.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Request body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Splits the request into its parts.
    pub fn into_parts(self) -> (Method, Url, Option<RequestBody>) {
        (self.method, self.uri, self.body)
    }
}

/// Fully read response from the service.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    uri: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TransportResponse {
    /// Creates a response for a request sent to `uri`.
    pub fn new(uri: Url, status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            uri,
            status,
            headers,
            body: body.into(),
        }
    }

    /// Target of the request this response answers.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DecodeFailed`] if the body does not match `T`.
    pub fn json<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body).map_err(|e| Error::decode_failed(self.uri.clone(), e))
    }
}
