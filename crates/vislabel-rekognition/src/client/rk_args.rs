//! Command-line arguments for the Rekognition client.

use std::time::Duration;

use clap::Args;

use super::rk_config::{DEFAULT_REGION, RekognitionConfig};
use crate::credentials::DEFAULT_PROFILE;
use crate::Result;

/// Rekognition settings read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct RekognitionArgs {
    /// Region hosting the Rekognition endpoint
    #[arg(long = "aws-region", env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// Profile of the shared credentials file to use
    #[arg(long = "aws-profile", env = "AWS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Read credentials from AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY
    /// instead of the shared credentials file
    #[arg(long = "aws-env-credentials", env = "AWS_ENV_CREDENTIALS")]
    pub environment_credentials: bool,

    /// Endpoint override for Rekognition-compatible services
    #[arg(long = "rekognition-endpoint", env = "REKOGNITION_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long = "rekognition-timeout",
        env = "REKOGNITION_TIMEOUT",
        default_value_t = 30
    )]
    pub timeout_secs: u64,
}

impl RekognitionArgs {
    /// Builds a validated client configuration.
    pub fn into_config(self) -> Result<RekognitionConfig> {
        let mut config = RekognitionConfig::new(&self.region)?
            .with_timeout(Duration::from_secs(self.timeout_secs));

        config = if self.environment_credentials {
            config.with_environment_credentials()
        } else {
            config.with_profile(self.profile)
        };

        if let Some(endpoint) = self.endpoint {
            config = config.with_endpoint(endpoint)?;
        }

        Ok(config)
    }
}
