//! Integration tests for the Lendscore HTTP surface
//!
//! Builds the real router over artifacts written to disk and drives it
//! with in-process requests, covering the status-code contract end to end.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use lendscore_model::{ModelArtifacts, ScoringPipeline};
use lendscore_server::{create_router, AppState, ServerConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const PREPROCESSOR: &str = r#"{
    "numeric": [
        {"name": "fico_avg", "center": 700.0, "scale": 50.0},
        {"name": "dti_capped", "center": 18.0, "scale": 8.0}
    ],
    "categorical": [
        {"name": "grade", "categories": ["A", "B", "C"]}
    ]
}"#;

const CLASSIFIER: &str = r#"{
    "version": "v1",
    "labels": {"negative": "repay", "positive": "default"},
    "coefficients": [-1.2, 0.7, -0.5, 0.1, 0.6],
    "intercept": -1.5
}"#;

fn test_router() -> Router {
    let mut pre = NamedTempFile::new().unwrap();
    pre.write_all(PREPROCESSOR.as_bytes()).unwrap();
    let mut clf = NamedTempFile::new().unwrap();
    clf.write_all(CLASSIFIER.as_bytes()).unwrap();

    let artifacts = ModelArtifacts::load(pre.path(), clf.path()).unwrap();
    let metrics = PrometheusBuilder::new().build_recorder().handle();

    let state = AppState::new(
        ServerConfig::default(),
        ScoringPipeline::new(artifacts),
        metrics,
    );
    create_router(state)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn good_payload() -> String {
    json!({"fico_avg": 710, "dti_capped": 16.0, "grade": "B"}).to_string()
}

#[tokio::test]
async fn health_reports_model_version() {
    let response = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-model-version"], "v1");
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_version"], "v1");
}

#[tokio::test]
async fn predict_scores_a_well_formed_request() {
    let response = test_router()
        .oneshot(post("/predict", &good_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let label = body["label"].as_str().unwrap();
    assert!(["APPROVE", "MANUAL_REVIEW", "REJECT"].contains(&label));

    let probs = body["probabilities"].as_object().unwrap();
    let total: f64 = probs.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-6);
    assert!(probs.contains_key("repay"));
    assert!(probs.contains_key("default"));

    assert_eq!(body["model_version"], "v1");
    assert!(body["request_id"].as_str().is_some());
    assert!(body["pd"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn predict_is_idempotent() {
    let router = test_router();

    let first = body_json(
        router
            .clone()
            .oneshot(post("/predict", &good_payload()))
            .await
            .unwrap(),
    )
    .await;
    let second = body_json(
        router
            .oneshot(post("/predict", &good_payload()))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["pd"], second["pd"]);
    assert_eq!(first["label"], second["label"]);
    assert_eq!(first["probabilities"], second["probabilities"]);
}

#[tokio::test]
async fn predict_rejects_empty_object() {
    let response = test_router().oneshot(post("/predict", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert!(body["request_id"].as_str().is_some());
}

#[tokio::test]
async fn predict_rejects_non_object_payloads() {
    for payload in [r#"[1, 2, 3]"#, r#""text""#, "42"] {
        let response = test_router().oneshot(post("/predict", payload)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload {payload} should be a client error"
        );
    }
}

#[tokio::test]
async fn predict_rejects_nested_feature_values() {
    let payload = json!({"fico_avg": 710, "dti_capped": 16, "grade": ["A", "B"]}).to_string();
    let response = test_router().oneshot(post("/predict", &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn predict_rejects_wrong_numeric_type_with_field_name() {
    let payload = json!({
        "fico_avg": "thirty-four",
        "dti_capped": 16,
        "grade": "A",
    })
    .to_string();
    let response = test_router().oneshot(post("/predict", &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["field"], "fico_avg");
}

#[tokio::test]
async fn predict_rejects_unknown_category_with_field_name() {
    let payload = json!({"fico_avg": 710, "dti_capped": 16, "grade": "Z"}).to_string();
    let response = test_router().oneshot(post("/predict", &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["field"], "grade");
    assert!(body["message"].as_str().unwrap().contains("unknown category"));
}

#[tokio::test]
async fn predict_rejects_malformed_json() {
    let response = test_router()
        .oneshot(post("/predict", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
}

#[tokio::test]
async fn validate_reports_every_problem_at_once() {
    let payload = json!({"fico_avg": "not a number", "grade": ""}).to_string();
    let response = test_router().oneshot(post("/validate", &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["missing_fields"], json!(["dti_capped"]));
    assert_eq!(body["bad_numeric_fields"], json!(["fico_avg"]));
    assert_eq!(body["bad_categorical_fields"], json!(["grade"]));
    assert_eq!(
        body["required_fields"],
        json!(["fico_avg", "dti_capped", "grade"])
    );
}

#[tokio::test]
async fn validate_treats_unparseable_payload_as_all_missing() {
    let response = test_router().oneshot(post("/validate", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body["missing_fields"],
        json!(["fico_avg", "dti_capped", "grade"])
    );
}

#[tokio::test]
async fn sanity_confirms_model_direction() {
    let response = test_router()
        .oneshot(post("/sanity", &good_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    // fico coefficient is negative, dti positive: the perturbations must
    // move pd in the documented directions.
    let expectations = &body["expected_behavior"];
    assert_eq!(expectations["fico_780_should_be_lower_than_base"], true);
    assert_eq!(expectations["fico_600_should_be_higher_than_base"], true);
    assert_eq!(expectations["dti_30_should_be_higher_than_base"], true);

    assert!(body["pd_base"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let response = test_router()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = test_router()
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
