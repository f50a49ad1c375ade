//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── service: ServiceConfig  # Endpoint, subscription key, polling, timeouts
//! └── batch: BatchConfig      # Directories, application, slot, options
//! ```
//!
//! Every option can be given as an argument or an environment variable.
//!
//! # Example
//!
//! ```bash
//! docpredict --endpoint https://westus.api.cognitive.microsoft.com \
//!     --app-id 9a1c3e2f-... --input-dir ./inbox --output-dir ./out
//!
//! # Or via environment variables
//! DOCPREDICT_SUBSCRIPTION_KEY=... DOCPREDICT_APP_ID=... docpredict
//! ```

mod batch;
mod service;

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use self::batch::BatchConfig;
pub use self::service::ServiceConfig;
use crate::TRACING_TARGET_STARTUP;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "docpredict")]
#[command(about = "Convert documents to text and run predictions on every chunk")]
#[command(version)]
pub struct Cli {
    /// Service connection configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Batch input, output and prediction configuration.
    #[clap(flatten)]
    pub batch: BatchConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.service
            .validate()
            .context("invalid service configuration")?;
        self.batch.validate().context("invalid batch configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.service.log();
        self.batch.log();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use docpredict_core::PublishSlot;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "docpredict",
        "--endpoint",
        "https://westus.api.cognitive.microsoft.com",
        "--subscription-key",
        "key",
        "--app-id",
        "app",
        "--input-dir",
        "./inbox",
    ];

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();

        assert_eq!(cli.service.polling_interval_ms, 1000);
        assert_eq!(cli.batch.slot, PublishSlot::Production);
        assert!(cli.batch.options().include_classifier_scores);
        assert!(cli.batch.options().include_verbose_extraction);
        assert!(!cli.batch.options().log_query);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_slot_parses_case_insensitively() {
        let args = REQUIRED.into_iter().chain(["--slot", "Staging"]);
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.batch.slot, PublishSlot::Staging);
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        let args = REQUIRED.into_iter().chain(["--slot", "canary"]);
        assert!(Cli::try_parse_from(args).is_err());
    }
}
