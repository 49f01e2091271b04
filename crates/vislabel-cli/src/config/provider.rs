//! Label provider configuration.

use anyhow::Context;
use clap::{Args, ValueEnum};
use vislabel_core::{DetectionService, ImageFetchConfig, ImageResolver};
use vislabel_rekognition::{RekognitionArgs, RekognitionClient};

use crate::TRACING_TARGET_CONFIG;

/// Backend answering label detection requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProviderKind {
    /// Amazon Rekognition `DetectLabels`.
    #[default]
    Rekognition,
    /// Canned labels, no network access. Needs the `mock` feature.
    Mock,
}

/// Provider selection together with the Rekognition client settings.
#[derive(Debug, Clone, Args)]
pub struct ProviderConfig {
    /// Label provider to use
    #[arg(long, env = "PROVIDER", value_enum, default_value_t = ProviderKind::Rekognition)]
    pub provider: ProviderKind,

    /// Rekognition client settings.
    #[clap(flatten)]
    pub rekognition: RekognitionArgs,

    /// Limits for images downloaded from a URL.
    #[clap(flatten)]
    pub fetch: ImageFetchConfig,
}

impl ProviderConfig {
    /// Validates the download limits.
    pub fn validate(&self) -> anyhow::Result<()> {
        let timeout = self.fetch.fetch_timeout;
        anyhow::ensure!(
            (1..=300).contains(&timeout),
            "Image fetch timeout {timeout} seconds is invalid. Must be between 1 and 300 seconds."
        );
        anyhow::ensure!(
            self.fetch.max_image_size > 0,
            "Maximum image size must be greater than zero"
        );
        Ok(())
    }

    /// Logs provider configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            fetch_timeout_secs = self.fetch.fetch_timeout,
            max_image_size = self.fetch.max_image_size,
            "Image download limits"
        );

        match self.provider {
            ProviderKind::Rekognition => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                provider = "rekognition",
                region = %self.rekognition.region,
                endpoint = ?self.rekognition.endpoint,
                environment_credentials = self.rekognition.environment_credentials,
                timeout_secs = self.rekognition.timeout_secs,
                "Provider configuration"
            ),
            ProviderKind::Mock => tracing::info!(
                target: TRACING_TARGET_CONFIG,
                provider = "mock",
                "Provider configuration"
            ),
        }
    }
}

/// Creates the detection service for the configured provider.
///
/// # Errors
///
/// Returns an error if the Rekognition settings are invalid, or if the mock
/// provider is requested from a build without the `mock` feature.
pub fn create_detection_service(config: &ProviderConfig) -> anyhow::Result<DetectionService> {
    let service = match config.provider {
        ProviderKind::Rekognition => {
            let client_config = config
                .rekognition
                .clone()
                .into_config()
                .context("invalid Rekognition configuration")?;
            let client =
                RekognitionClient::new(client_config).context("failed to create Rekognition client")?;
            DetectionService::from_provider(client)
        }
        ProviderKind::Mock => create_mock_service()?,
    };

    let resolver =
        ImageResolver::from_config(&config.fetch).context("failed to create image resolver")?;
    Ok(service.with_resolver(resolver))
}

#[cfg(feature = "mock")]
fn create_mock_service() -> anyhow::Result<DetectionService> {
    use vislabel_core::{LabelEntry, MockProvider};

    let provider = MockProvider::with_labels(vec![
        LabelEntry::new("Object", 99.0),
        LabelEntry::new("Photography", 87.5),
        LabelEntry::new("Outdoors", 62.0),
    ]);
    Ok(provider.into_service())
}

#[cfg(not(feature = "mock"))]
fn create_mock_service() -> anyhow::Result<DetectionService> {
    anyhow::bail!("the mock provider is not available; rebuild with the `mock` feature")
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        provider: ProviderConfig,
    }

    #[test]
    fn rekognition_is_the_default() {
        let cli = TestCli::parse_from(["test", "--aws-env-credentials"]);
        assert_eq!(cli.provider.provider, ProviderKind::Rekognition);

        let service = create_detection_service(&cli.provider).unwrap();
        assert_eq!(service.provider_name(), "rekognition");
    }

    #[test]
    fn fetch_limits_reach_the_resolver() {
        let cli = TestCli::parse_from([
            "test",
            "--max-image-size",
            "1024",
            "--image-fetch-timeout",
            "5",
        ]);
        assert!(cli.provider.validate().is_ok());
        assert_eq!(cli.provider.fetch.max_image_size, 1024);

        let resolver = ImageResolver::from_config(&cli.provider.fetch).unwrap();
        assert_eq!(resolver.max_bytes(), 1024);
    }

    #[test]
    fn invalid_fetch_limits_are_rejected() {
        let cli = TestCli::parse_from(["test", "--image-fetch-timeout", "0"]);
        assert!(cli.provider.validate().is_err());

        let cli = TestCli::parse_from(["test", "--max-image-size", "0"]);
        assert!(cli.provider.validate().is_err());
    }

    #[test]
    fn unknown_region_is_rejected() {
        let cli = TestCli::parse_from(["test", "--aws-region", "mars-north-1"]);
        assert!(create_detection_service(&cli.provider).is_err());
    }

    #[test]
    fn provider_flag_parses() {
        let cli = TestCli::parse_from(["test", "--provider", "mock"]);
        assert_eq!(cli.provider.provider, ProviderKind::Mock);
    }

    #[cfg(feature = "mock")]
    #[test]
    fn mock_provider_builds() {
        let cli = TestCli::parse_from(["test", "--provider", "mock"]);
        let service = create_detection_service(&cli.provider).unwrap();
        assert_eq!(service.provider_name(), "mock");
    }

    #[cfg(not(feature = "mock"))]
    #[test]
    fn mock_provider_needs_feature() {
        let cli = TestCli::parse_from(["test", "--provider", "mock"]);
        assert!(create_detection_service(&cli.provider).is_err());
    }
}
