//! Label detection handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use vislabel_core::{DetectionResult, DetectionService, ImageSource, validate_parameters};

use crate::extract::{Json, Query, RawBody};
use crate::handler::Result;
use crate::handler::request::{DetectLabels, DetectionQuery, LabelsQuery};
use crate::service::{DetectionDefaults, ServiceState};

/// Tracing target for label detection handlers.
const TRACING_TARGET: &str = "vislabel_server::handler::labels";

/// Detects labels on an image referenced by URL, object key or inline bytes.
///
/// The source comes from the JSON body or, for an empty body, from the
/// `imageURL` query parameter.
#[tracing::instrument(skip_all)]
async fn detect_labels(
    State(detection): State<DetectionService>,
    State(defaults): State<DetectionDefaults>,
    Query(query): Query<LabelsQuery>,
    request: Option<Json<DetectLabels>>,
) -> Result<Json<DetectionResult>> {
    let Json(request) = request.unwrap_or_default();
    let (request, query_url) = request.merge_query(query);

    let params = defaults.parameters(request.max_labels, request.min_confidence);
    validate_parameters(&params)?;
    let source = request.image_source(query_url.as_deref())?;

    tracing::debug!(
        target: TRACING_TARGET,
        source = source.kind(),
        max_labels = params.max_labels,
        min_confidence = params.min_confidence,
        "Label detection requested"
    );

    let result = detection.detect(source, params).await?;

    tracing::info!(
        target: TRACING_TARGET,
        label_count = result.label_count(),
        "Labels detected"
    );

    Ok(Json(result))
}

/// Detects labels on the raw image bytes sent as the request body.
#[tracing::instrument(skip_all, fields(size = body.len()))]
async fn detect_labels_from_bytes(
    State(detection): State<DetectionService>,
    State(defaults): State<DetectionDefaults>,
    Query(query): Query<DetectionQuery>,
    body: RawBody,
) -> Result<Json<DetectionResult>> {
    let params = defaults.parameters(query.max_labels, query.min_confidence);

    tracing::debug!(
        target: TRACING_TARGET,
        max_labels = params.max_labels,
        min_confidence = params.min_confidence,
        "Label detection on request body requested"
    );

    let result = detection
        .detect(ImageSource::bytes(body.into_inner()), params)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        label_count = result.label_count(),
        "Labels detected"
    );

    Ok(Json(result))
}

/// Returns a [`Router`] with all label detection routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/labels", post(detect_labels))
        .route("/labels/bytes", post(detect_labels_from_bytes))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use bytes::Bytes;
    use serde_json::{Value, json};
    use vislabel_core::{ImageResolver, LabelEntry, MockProvider, ProviderFailure};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::handler::test::create_test_server_with_service;

    fn scenario_provider() -> MockProvider {
        MockProvider::with_labels(vec![
            LabelEntry::new("Car", 92.1),
            LabelEntry::new("Vehicle", 81.0),
            LabelEntry::new("Road", 40.0),
        ])
    }

    fn server(provider: &MockProvider) -> anyhow::Result<TestServer> {
        create_test_server_with_service(provider.clone().into_service())
    }

    #[tokio::test]
    async fn detects_from_base64_body() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .json(&json!({"image": "/9j/", "maxLabels": 3, "minConfidence": 50}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "labels": [
                {"name": "Car", "confidence": 92.1},
                {"name": "Vehicle", "confidence": 81.0}
            ]
        }));
        assert_eq!(provider.invocations(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn detects_from_object_reference() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .json(&json!({"bucket": "photos", "key": "street/car.jpg", "maxLabels": 1}))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["labels"].as_array().map(Vec::len), Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn detects_from_query_url() -> anyhow::Result<()> {
        let images = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/car.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .expect(1)
            .mount(&images)
            .await;

        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .add_query_param("imageURL", format!("{}/car.jpg", images.uri()))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["labels"][0]["name"], "Car");
        Ok(())
    }

    #[tokio::test]
    async fn defaults_apply_when_parameters_are_omitted() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server.post("/labels").json(&json!({"image": "/9j/"})).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        // minConfidence defaults to 55, which drops "Road".
        assert_eq!(body["labels"].as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn empty_detection_is_success() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .json(&json!({"image": "/9j/", "minConfidence": 99}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"labels": []}));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_parameters_never_reach_provider() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        for body in [
            json!({"image": "/9j/", "maxLabels": 0}),
            json!({"image": "/9j/", "minConfidence": 101}),
            json!({"image": "/9j/", "minConfidence": -1}),
            json!({"imageUrl": "not a url"}),
            json!({"image": "%%%"}),
            json!({}),
            json!({"image": "/9j/", "bucket": "photos", "key": "car.jpg"}),
        ] {
            let response = server.post("/labels").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let error = response.json::<Value>();
            assert_eq!(error["name"], "invalid_parameter", "{body}");
        }

        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn parameter_bounds_are_reported_before_source() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        for (body, field) in [
            (json!({"maxLabels": -1}), "maxLabels"),
            (json!({"image": "%%%", "maxLabels": -1}), "maxLabels"),
            (json!({"minConfidence": 150}), "minConfidence"),
        ] {
            let response = server.post("/labels").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);

            let error = response.json::<Value>();
            assert_eq!(error["name"], "invalid_parameter");
            assert!(
                error["message"].as_str().is_some_and(|m| m.contains(field)),
                "{body}: {error}"
            );
        }

        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .content_type("application/json")
            .bytes(Bytes::from_static(b"{\"image\":"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["name"], "bad_request");
        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn provider_failures_map_to_status() -> anyhow::Result<()> {
        let table = [
            ("InvalidS3ObjectException", StatusCode::BAD_REQUEST, "invalid_data_reference"),
            ("InvalidImageFormatException", StatusCode::BAD_REQUEST, "invalid_image_format"),
            ("ImageTooLargeException", StatusCode::BAD_REQUEST, "invalid_image_size"),
            ("AccessDeniedException", StatusCode::FORBIDDEN, "access_denied"),
            (
                "ProvisionedThroughputExceededException",
                StatusCode::TOO_MANY_REQUESTS,
                "too_many_requests",
            ),
            ("ThrottlingException", StatusCode::SERVICE_UNAVAILABLE, "service_unavailable"),
            ("InternalServerError", StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            ("SomethingNew", StatusCode::INTERNAL_SERVER_ERROR, "detection_failed"),
        ];

        for (code, status, name) in table {
            let provider = MockProvider::failing(ProviderFailure::new(code, "provider said no"));
            let server = server(&provider)?;

            let response = server
                .post("/labels")
                .json(&json!({"bucket": "photos", "key": "car.jpg"}))
                .await;

            response.assert_status(status);
            let error = response.json::<Value>();
            assert_eq!(error["name"], name, "{code}");
            assert!(
                error["message"]
                    .as_str()
                    .is_some_and(|m| m.contains("provider said no"))
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn unreachable_image_is_bad_gateway() -> anyhow::Result<()> {
        let images = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&images)
            .await;

        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels")
            .json(&json!({"imageUrl": format!("{}/missing.jpg", images.uri())}))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let error = response.json::<Value>();
        assert_eq!(error["name"], "image_fetch");
        assert!(error["suggestion"].is_string());
        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn oversize_url_image_is_rejected() -> anyhow::Result<()> {
        let images = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/huge.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF; 8 * 1024]))
            .mount(&images)
            .await;

        let provider = scenario_provider();
        let resolver = ImageResolver::new(Duration::from_secs(5))?.with_max_bytes(1024);
        let server =
            create_test_server_with_service(provider.clone().into_service().with_resolver(resolver))?;

        let response = server
            .post("/labels")
            .json(&json!({"imageUrl": format!("{}/huge.jpg", images.uri())}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error = response.json::<Value>();
        assert_eq!(error["name"], "invalid_image_size");
        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn detects_from_raw_bytes() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels/bytes")
            .add_query_param("maxLabels", 1)
            .content_type("image/jpeg")
            .bytes(Bytes::from_static(&[0xFF, 0xD8, 0xFF]))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"labels": [{"name": "Car", "confidence": 92.1}]}));
        Ok(())
    }

    #[tokio::test]
    async fn empty_raw_body_is_rejected() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server.post("/labels/bytes").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["name"], "invalid_parameter");
        assert_eq!(provider.invocations(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_query_is_bad_request() -> anyhow::Result<()> {
        let provider = scenario_provider();
        let server = server(&provider)?;

        let response = server
            .post("/labels/bytes")
            .add_query_param("maxLabels", "many")
            .bytes(Bytes::from_static(&[0xFF, 0xD8, 0xFF]))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["name"], "bad_request");
        Ok(())
    }
}
