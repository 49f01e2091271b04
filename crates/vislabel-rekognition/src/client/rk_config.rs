//! Configuration for the Rekognition client.

use std::time::Duration;

use url::Url;

use crate::{CredentialSource, Credentials, Error, Result};

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Default request timeout: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Regions the client accepts.
pub const KNOWN_REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "ca-west-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// Configuration for the Rekognition client.
///
/// # Examples
///
/// ```ignore
/// use std::time::Duration;
/// use vislabel_rekognition::RekognitionConfig;
///
/// // Region with the default profile
/// let config = RekognitionConfig::new("us-east-1")?;
///
/// // Environment credentials against a local endpoint
/// let config = RekognitionConfig::builder()
///     .region("eu-west-1")
///     .environment_credentials()
///     .endpoint("http://localhost:4566")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RekognitionConfig {
    /// Region hosting the service
    region: String,

    /// Where credentials come from
    credentials: CredentialSource,

    /// Endpoint override, for compatible services and tests
    endpoint: Option<Url>,

    /// Request timeout duration
    timeout: Duration,

    /// User agent string for HTTP requests
    user_agent: String,
}

impl RekognitionConfig {
    /// Create a configuration for `region` with default settings.
    ///
    /// Fails if the region is not one of [`KNOWN_REGIONS`].
    pub fn new(region: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            region: validate_region(region.as_ref())?,
            ..Self::default()
        })
    }

    /// Create a new configuration builder.
    pub fn builder() -> RekognitionConfigBuilder {
        RekognitionConfigBuilder::default()
    }

    /// Get the region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Get the credential source.
    pub fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the user agent string.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Get the endpoint override, if any.
    pub fn endpoint_override(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> Result<Url> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.clone());
        }

        let suffix = if self.region.starts_with("cn-") {
            "amazonaws.com.cn"
        } else {
            "amazonaws.com"
        };

        let raw = format!("https://rekognition.{}.{}/", self.region, suffix);
        Url::parse(&raw).map_err(|e| Error::config(format!("Invalid endpoint '{raw}': {e}")))
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl AsRef<str>) -> Result<Self> {
        self.region = validate_region(region.as_ref())?;
        Ok(self)
    }

    /// Read credentials from a named profile of the shared credentials file.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.credentials = CredentialSource::Profile(profile.into());
        self
    }

    /// Read credentials from the standard environment variables.
    pub fn with_environment_credentials(mut self) -> Self {
        self.credentials = CredentialSource::Environment;
        self
    }

    /// Use the given credential source.
    pub fn with_credentials(mut self, source: CredentialSource) -> Self {
        self.credentials = source;
        self
    }

    /// Send requests to `endpoint` instead of the regional one.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref()).map_err(|e| {
            Error::config(format!("Invalid endpoint '{}': {}", endpoint.as_ref(), e))
        })?;
        self.endpoint = Some(endpoint);
        Ok(self)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for RekognitionConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_owned(),
            credentials: CredentialSource::default(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("vislabel-rekognition/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

fn validate_region(region: &str) -> Result<String> {
    let region = region.trim();
    if KNOWN_REGIONS.contains(&region) {
        Ok(region.to_owned())
    } else {
        Err(Error::config(format!("Unknown region '{region}'")))
    }
}

/// Builder for [`RekognitionConfig`].
#[derive(Debug, Default)]
pub struct RekognitionConfigBuilder {
    region: Option<String>,
    credentials: Option<CredentialSource>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl RekognitionConfigBuilder {
    /// Set the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Read credentials from a named profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.credentials = Some(CredentialSource::Profile(profile.into()));
        self
    }

    /// Read credentials from the environment.
    pub fn environment_credentials(mut self) -> Self {
        self.credentials = Some(CredentialSource::Environment);
        self
    }

    /// Use static credentials.
    pub fn static_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(CredentialSource::Static(credentials));
        self
    }

    /// Set the endpoint override.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns an error if the region is unknown or the endpoint is invalid.
    pub fn build(self) -> Result<RekognitionConfig> {
        let mut config = match self.region {
            Some(region) => RekognitionConfig::new(region)?,
            None => RekognitionConfig::default(),
        };

        if let Some(credentials) = self.credentials {
            config = config.with_credentials(credentials);
        }

        if let Some(endpoint) = self.endpoint {
            config = config.with_endpoint(endpoint)?;
        }

        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RekognitionConfig::default();
        assert_eq!(config.region(), "eu-west-2");
        assert_eq!(
            config.credentials(),
            &CredentialSource::Profile("default".into())
        );
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://rekognition.eu-west-2.amazonaws.com/"
        );
    }

    #[test]
    fn test_unknown_region() {
        let error = RekognitionConfig::new("mars-north-1").unwrap_err();
        assert_eq!(error.category(), "config");

        let error = RekognitionConfig::default()
            .with_region("EU_WEST_2")
            .unwrap_err();
        assert!(error.to_string().contains("EU_WEST_2"));
    }

    #[test]
    fn test_china_endpoint() {
        let config = RekognitionConfig::new("cn-north-1").unwrap();
        assert_eq!(
            config.endpoint().unwrap().host_str(),
            Some("rekognition.cn-north-1.amazonaws.com.cn")
        );
    }

    #[test]
    fn test_fluent_api() {
        let config = RekognitionConfig::new("us-east-1")
            .unwrap()
            .with_profile("ci")
            .with_timeout(Duration::from_secs(5))
            .with_endpoint("http://localhost:4566")
            .unwrap();

        assert_eq!(config.credentials(), &CredentialSource::Profile("ci".into()));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:4566/"
        );

        let config = config.with_environment_credentials();
        assert_eq!(config.credentials(), &CredentialSource::Environment);
    }

    #[test]
    fn test_builder() {
        let config = RekognitionConfig::builder()
            .region("ap-southeast-2")
            .static_credentials(Credentials::new("AKID", "secret"))
            .user_agent("custom/1.0")
            .build()
            .unwrap();

        assert_eq!(config.region(), "ap-southeast-2");
        assert_eq!(config.user_agent(), "custom/1.0");
        assert!(matches!(config.credentials(), CredentialSource::Static(_)));
    }

    #[test]
    fn test_builder_invalid_endpoint() {
        let result = RekognitionConfig::builder().endpoint("not a url").build();
        assert!(result.is_err());
    }
}
