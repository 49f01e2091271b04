//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # Request timeout, body limit
//! ├── provider: ProviderConfig      # Label provider, Rekognition client, URL download limits
//! └── defaults: DetectionDefaults   # maxLabels / minConfidence fallbacks
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! vislabel --aws-region us-east-1 --port 8080 --default-max-labels 5
//!
//! # Or via environment variables
//! AWS_REGION=us-east-1 PORT=8080 DEFAULT_MAX_LABELS=5 vislabel
//! ```

mod middleware;
mod provider;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use middleware::MiddlewareConfig;
pub use provider::{ProviderConfig, ProviderKind, create_detection_service};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vislabel_server::service::DetectionDefaults;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "vislabel")]
#[command(about = "Image label detection server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (timeouts, body limit).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Label provider selection and client settings.
    #[clap(flatten)]
    pub provider: ProviderConfig,

    /// Detection parameters applied when a request omits them.
    #[clap(flatten)]
    pub defaults: DetectionDefaults,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read first so clap can use its values as defaults.
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

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.provider
            .validate()
            .context("invalid provider configuration")?;

        let defaults = self.defaults.parameters(None, None);
        anyhow::ensure!(
            defaults.is_within_bounds(),
            "invalid detection defaults: maxLabels must be at least 1 and minConfidence \
             between 0 and 100, got {} and {}",
            defaults.max_labels,
            defaults.min_confidence
        );

        Ok(())
    }

    /// Logs configuration at info level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();
        self.provider.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_labels = self.defaults.max_labels,
            min_confidence = self.defaults.min_confidence,
            "Detection defaults"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "mock").then_some("mock"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_and_validate() {
        let cli = Cli::parse_from(["vislabel"]);

        assert!(cli.validate().is_ok());
        assert_eq!(cli.server.port, 3000);
        assert_eq!(cli.middleware.recovery.request_timeout, 30);
        assert_eq!(cli.provider.provider, ProviderKind::Rekognition);
        assert_eq!(cli.defaults.max_labels, 10);
        assert_eq!(cli.provider.fetch.max_image_size, 5 * 1024 * 1024);
    }

    #[test]
    fn invalid_fetch_limits_fail_validation() {
        let cli = Cli::parse_from(["vislabel", "--image-fetch-timeout", "900"]);
        let err = cli.validate().unwrap_err();
        assert!(format!("{err:#}").contains("fetch timeout"));
    }

    #[test]
    fn invalid_defaults_are_rejected() {
        let cli = Cli::parse_from(["vislabel", "--default-min-confidence", "150"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["vislabel", "--default-max-labels", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn flags_from_every_group() {
        let cli = Cli::parse_from([
            "vislabel",
            "--port",
            "8080",
            "--request-timeout",
            "10",
            "--aws-region",
            "eu-west-1",
            "--default-max-labels",
            "3",
        ]);

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.middleware.recovery.request_timeout, 10);
        assert_eq!(cli.provider.rekognition.region, "eu-west-1");
        assert_eq!(cli.defaults.max_labels, 3);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
