//! Rekognition HTTP client implementation.

use jiff::Timestamp;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use url::Url;
use vislabel_core::{
    DetectionParameters, ImageHandle, LabelEntry, LabelProvider, ProviderFailure, ServiceHealth,
};

use crate::model::{DetectLabelsRequest, DetectLabelsResponse, ErrorBody, error_code};
use crate::signing::{SigningRequest, sign};
use crate::{Error, RekognitionConfig, Result, TRACING_TARGET};

const SERVICE: &str = "rekognition";
const CONTENT_TYPE_JSON: &str = "application/x-amz-json-1.1";
const DETECT_LABELS_TARGET: &str = "RekognitionService.DetectLabels";
const CREDENTIALS_ERROR: &str = "CredentialsError";
const SERIALIZATION_ERROR: &str = "SerializationError";

/// HTTP client for the Rekognition `DetectLabels` operation.
///
/// Each call is a single signed request; nothing is retried.
///
/// # Examples
///
/// ```ignore
/// use vislabel_rekognition::{RekognitionClient, RekognitionConfig};
///
/// let config = RekognitionConfig::new("eu-west-2")?.with_profile("default");
/// let client = RekognitionClient::new(config)?;
/// ```
#[derive(Debug, Clone)]
pub struct RekognitionClient {
    /// HTTP client
    http_client: Client,

    /// Resolved endpoint
    endpoint: Url,

    /// Configuration
    config: RekognitionConfig,
}

impl RekognitionClient {
    /// Create a new Rekognition client with the given configuration.
    pub fn new(config: RekognitionConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        if endpoint.host_str().is_none() {
            return Err(Error::config(format!("Endpoint '{endpoint}' has no host")));
        }

        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            target: TRACING_TARGET,
            region = config.region(),
            endpoint = %endpoint,
            credentials = %config.credentials().describe(),
            timeout = ?config.timeout(),
            "Rekognition client initialized"
        );

        Ok(Self {
            http_client,
            endpoint,
            config,
        })
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &RekognitionConfig {
        &self.config
    }

    /// `host[:port]` of the endpoint, as sent in the `Host` header.
    fn host(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }
    }

    /// Turns a non-success response into a provider failure.
    fn failure_from_response(status: u16, headers: &HeaderMap, body: &[u8]) -> ProviderFailure {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

        let raw_code = parsed.error_type.or_else(|| {
            headers
                .get("x-amzn-errortype")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        });

        let code = raw_code
            .as_deref()
            .map(error_code)
            .filter(|code| !code.is_empty())
            .unwrap_or("UnknownError")
            .to_owned();

        let message = parsed
            .message
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());

        ProviderFailure::new(code, message).with_status(status)
    }
}

#[async_trait::async_trait]
impl LabelProvider for RekognitionClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn detect_labels(
        &self,
        image: &ImageHandle,
        params: &DetectionParameters,
    ) -> std::result::Result<Vec<LabelEntry>, ProviderFailure> {
        // Missing credentials are a server misconfiguration, classified as
        // `DetectionFailed` rather than the caller's `AccessDenied`.
        let credentials = self
            .config
            .credentials()
            .resolve()
            .await
            .map_err(|e| ProviderFailure::new(CREDENTIALS_ERROR, e.to_string()))?;

        let payload = serde_json::to_vec(&DetectLabelsRequest::new(image, params))
            .map_err(|e| ProviderFailure::new(SERIALIZATION_ERROR, e.to_string()))?;

        let host = self.host();
        let signed = sign(
            &credentials,
            self.config.region(),
            SERVICE,
            SigningRequest {
                host: &host,
                content_type: CONTENT_TYPE_JSON,
                target: DETECT_LABELS_TARGET,
                payload: &payload,
            },
            Timestamp::now(),
        );

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint = %self.endpoint,
            payload_size = payload.len(),
            max_labels = params.max_labels,
            min_confidence = params.min_confidence,
            "Sending DetectLabels request"
        );

        let mut request = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header("x-amz-target", DETECT_LABELS_TARGET)
            .header("x-amz-date", &signed.amz_date)
            .header(AUTHORIZATION, &signed.authorization);
        if let Some(token) = &signed.security_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request.body(payload).send().await.map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "DetectLabels request did not complete"
            );
            ProviderFailure::network(e.to_string())
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderFailure::network(e.to_string()))?;

        if !status.is_success() {
            let failure = Self::failure_from_response(status.as_u16(), &headers, &body);
            tracing::debug!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                code = %failure.code,
                "DetectLabels request rejected"
            );
            return Err(failure);
        }

        let parsed: DetectLabelsResponse = serde_json::from_slice(&body).map_err(|e| {
            ProviderFailure::new(ProviderFailure::MALFORMED_RESPONSE, e.to_string())
                .with_status(status.as_u16())
        })?;

        tracing::debug!(
            target: TRACING_TARGET,
            label_count = parsed.labels.len(),
            "DetectLabels request completed"
        );

        Ok(parsed.labels.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> vislabel_core::Result<ServiceHealth> {
        match self.config.credentials().resolve().await {
            Ok(_) => Ok(ServiceHealth::healthy()),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Rekognition credentials unavailable"
                );
                Ok(ServiceHealth::unhealthy(error.to_string()))
            }
        }
    }
}
