//! Prediction client configuration.

use std::fmt;
use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};
use crate::poller::DEFAULT_POLLING_INTERVAL;

/// Default timeout for a single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the prediction client.
///
/// Set once at construction and shared read-only by every call.
#[derive(Clone, Builder)]
#[builder(
    name = "ClientConfigBuilder",
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct ClientConfig {
    /// Base URI of the service, e.g. `https://westus.api.cognitive.microsoft.com`.
    #[builder(setter(custom))]
    pub endpoint: Url,
    /// Key sent in the `Ocp-Apim-Subscription-Key` header.
    pub subscription_key: String,
    /// Wait between two status polls.
    #[builder(default = "DEFAULT_POLLING_INTERVAL")]
    pub polling_interval: Duration,
    /// Timeout for a single HTTP request.
    #[builder(default = "DEFAULT_TIMEOUT")]
    pub timeout: Duration,
    /// Timeout for establishing a connection.
    #[builder(default = "DEFAULT_CONNECT_TIMEOUT")]
    pub connect_timeout: Duration,
    /// User agent string for requests.
    #[builder(default = "ClientConfig::default_user_agent()")]
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("subscription_key", &"<redacted>")
            .field("polling_interval", &self.polling_interval)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    fn default_user_agent() -> String {
        format!("docpredict/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl ClientConfigBuilder {
    /// Set the base URI of the service
    pub fn with_endpoint(mut self, url: &str) -> Result<Self> {
        let endpoint: Url = url
            .parse()
            .map_err(|e| Error::invalid_config(format!("Invalid endpoint '{}': {}", url, e)))?;

        if endpoint.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "Endpoint '{}' cannot carry a path",
                url
            )));
        }

        self.endpoint = Some(endpoint);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(key) = &self.subscription_key {
            if key.trim().is_empty() {
                return Err("Subscription key must not be empty".to_string());
            }
        }

        if let Some(interval) = &self.polling_interval {
            if interval.is_zero() {
                return Err("Polling interval must be greater than 0".to_string());
            }
        }

        if let Some(timeout) = &self.timeout {
            if timeout.is_zero() {
                return Err("Timeout must be greater than 0".to_string());
            }
        }

        if let Some(connect_timeout) = &self.connect_timeout {
            if connect_timeout.is_zero() {
                return Err("Connect timeout must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
            .with_endpoint("https://westus.api.cognitive.microsoft.com")
            .expect("Valid URL")
            .with_subscription_key("key")
    }

    #[test]
    fn test_defaults() {
        let config = builder().build().expect("Valid config");

        assert_eq!(config.polling_interval, Duration::from_secs(1));
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent.starts_with("docpredict/"));
    }

    #[test]
    fn test_polling_interval_override() {
        let config = builder()
            .with_polling_interval(Duration::from_millis(250))
            .build()
            .expect("Valid config");

        assert_eq!(config.polling_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_missing_endpoint() {
        let result = ClientConfig::builder().with_subscription_key("key").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subscription_key() {
        let result = ClientConfig::builder()
            .with_endpoint("https://example.com")
            .expect("Valid URL")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(ClientConfig::builder().with_endpoint("not-a-valid-url").is_err());
        assert!(ClientConfig::builder().with_endpoint("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(builder().with_subscription_key("  ").build().is_err());
        assert!(builder().with_polling_interval(Duration::ZERO).build().is_err());
        assert!(builder().with_timeout(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = builder().with_subscription_key("super-secret").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_builder_error_converts() {
        let err: Error = ClientConfig::builder().build().unwrap_err().into();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }
}
