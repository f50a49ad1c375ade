//! Reqwest-based transport provider.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};

use super::{RequestBody, TransportProvider, TransportRequest, TransportResponse};
use crate::TRACING_TARGET_TRANSPORT;
use crate::client::ClientConfig;
use crate::error::{Error, Result};

/// Header carrying the subscription key on every request.
pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Transport provider backed by a pooled [`reqwest::Client`].
///
/// The subscription key and `Accept: application/json` are installed as
/// default headers when the client is built and never change afterwards.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Creates a transport from the client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription key is not a valid header value
    /// or the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            timeout_ms = config.timeout.as_millis(),
            connect_timeout_ms = config.connect_timeout.as_millis(),
            "Creating reqwest transport"
        );

        let mut subscription_key = HeaderValue::from_str(&config.subscription_key)
            .map_err(|_| Error::invalid_config("subscription key is not a valid header value"))?;
        subscription_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(SUBSCRIPTION_KEY_HEADER),
            subscription_key,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = ClientBuilder::new()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl TransportProvider for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let (method, uri, body) = request.into_parts();

        let mut builder = self.http.request(method, uri.clone());
        builder = match body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::File {
                field,
                file_name,
                content,
            }) => {
                let part = Part::bytes(content.to_vec()).file_name(file_name);
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(TransportResponse::new(uri, status, headers, body))
    }
}
