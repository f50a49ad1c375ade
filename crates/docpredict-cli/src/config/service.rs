//! Service connection configuration.

use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Args;
use docpredict_client::ClientConfig;

use crate::TRACING_TARGET_CONFIG;

/// Service connection configuration.
///
/// # Environment Variables
///
/// - `DOCPREDICT_ENDPOINT` - Base URI of the service
/// - `DOCPREDICT_SUBSCRIPTION_KEY` - Subscription key (never logged)
/// - `DOCPREDICT_POLLING_INTERVAL_MS` - Wait between status polls (default: 1000)
/// - `DOCPREDICT_REQUEST_TIMEOUT` - Per-request timeout in seconds (default: 30)
#[derive(Clone, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Base URI of the prediction service.
    #[arg(long, env = "DOCPREDICT_ENDPOINT")]
    pub endpoint: String,

    /// Subscription key sent with every request.
    #[arg(long, env = "DOCPREDICT_SUBSCRIPTION_KEY", hide_env_values = true)]
    pub subscription_key: String,

    /// Wait in milliseconds between two status polls of an operation.
    #[arg(long, env = "DOCPREDICT_POLLING_INTERVAL_MS", default_value_t = 1000)]
    pub polling_interval_ms: u64,

    /// Maximum time in seconds for a single HTTP request.
    #[arg(long, env = "DOCPREDICT_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("subscription_key", &"<redacted>")
            .field("polling_interval_ms", &self.polling_interval_ms)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ServiceConfig {
    /// Validates the configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.polling_interval_ms == 0 {
            return Err(anyhow!("Polling interval must be greater than 0"));
        }

        if self.request_timeout == 0 || self.request_timeout > 600 {
            return Err(anyhow!(
                "Request timeout must be between 1 and 600 seconds, got {}",
                self.request_timeout
            ));
        }

        Ok(())
    }

    /// Builds the prediction client configuration.
    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let config = ClientConfig::builder()
            .with_endpoint(&self.endpoint)
            .context("invalid endpoint")?
            .with_subscription_key(self.subscription_key.as_str())
            .with_polling_interval(Duration::from_millis(self.polling_interval_ms))
            .with_timeout(Duration::from_secs(self.request_timeout))
            .build()
            .context("invalid client configuration")?;

        Ok(config)
    }

    /// Logs the configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            endpoint = %self.endpoint,
            polling_interval_ms = self.polling_interval_ms,
            request_timeout_secs = self.request_timeout,
            "Service configuration"
        );
    }
}
