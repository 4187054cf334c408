//! HTTP routes and handlers

use axum::{
    extract::rejection::JsonRejection,
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Instant;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::state::AppState;
use lendscore_core::{Error, FeatureValue, InferenceRequest, Prediction, Result};
use lendscore_model::SchemaReport;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;
    let version_header = HeaderValue::from_str(state.pipeline.model_version())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/validate", post(validate))
        .route("/predict", post(predict))
        .route("/sanity", post(sanity))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-model-version"),
            version_header,
        ))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model_version": state.pipeline.model_version(),
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Response body for a successful scoring request
#[derive(Debug, Serialize)]
struct PredictResponse {
    label: String,
    probabilities: BTreeMap<String, f64>,
    pd: f64,
    risk_category: &'static str,
    model_version: String,
    request_id: String,
    latency_ms: u64,
}

/// Main scoring handler
async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    metrics::counter!("lendscore_requests_total", "route" => "predict").increment(1);

    let Json(payload) = payload.map_err(|e| {
        ApiError::new(Error::input(format!("body is not valid JSON: {e}")), request_id)
    })?;

    let request =
        InferenceRequest::parse(&payload).map_err(|e| ApiError::new(e, request_id))?;

    let prediction = score_with_deadline(&state, request)
        .await
        .map_err(|e| ApiError::new(e, request_id))?;

    let latency_ms = started.elapsed().as_millis() as u64;
    metrics::histogram!("lendscore_scoring_latency_us")
        .record(started.elapsed().as_micros() as f64);
    metrics::counter!("lendscore_decisions_total", "decision" => prediction.label.clone())
        .increment(1);

    info!(
        %request_id,
        pd = prediction.pd,
        decision = %prediction.label,
        latency_ms,
        "request scored"
    );

    Ok(Json(PredictResponse {
        label: prediction.label.clone(),
        probabilities: prediction
            .probabilities
            .iter()
            .map(|(k, v)| (k.clone(), round6(*v)))
            .collect(),
        pd: round6(prediction.pd),
        risk_category: prediction.risk_band.category(),
        model_version: state.pipeline.model_version().to_string(),
        request_id: request_id.to_string(),
        latency_ms,
    }))
}

/// Dry-run schema check; always 200, reports every problem at once
async fn validate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Json<SchemaReport> {
    metrics::counter!("lendscore_requests_total", "route" => "validate").increment(1);

    let request = payload
        .ok()
        .and_then(|Json(value)| InferenceRequest::parse(&value).ok());

    let report = match request {
        Some(request) => state.pipeline.schema_report(&request),
        // Unparseable payloads report the full schema as missing, so a
        // caller probing with an empty body still learns what to send.
        None => SchemaReport {
            missing_fields: state
                .pipeline
                .required_columns()
                .into_iter()
                .map(String::from)
                .collect(),
            bad_numeric_fields: Vec::new(),
            bad_categorical_fields: Vec::new(),
            required_fields: state
                .pipeline
                .required_columns()
                .into_iter()
                .map(String::from)
                .collect(),
        },
    };

    Json(report)
}

/// Response body for the sanity endpoint
#[derive(Debug, Serialize)]
struct SanityResponse {
    pd_base: f64,
    pd_fico_780: f64,
    pd_fico_600: f64,
    pd_dti_30: f64,
    expected_behavior: SanityExpectations,
}

#[derive(Debug, Serialize)]
struct SanityExpectations {
    fico_780_should_be_lower_than_base: bool,
    fico_600_should_be_higher_than_base: bool,
    dti_30_should_be_higher_than_base: bool,
}

/// Quick behavior checks against the loaded model:
/// FICO up should reduce pd, FICO down and DTI up should increase it.
async fn sanity(
    State(state): State<AppState>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> std::result::Result<Json<SanityResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    metrics::counter!("lendscore_requests_total", "route" => "sanity").increment(1);

    let Json(payload) = payload.map_err(|e| {
        ApiError::new(Error::input(format!("body is not valid JSON: {e}")), request_id)
    })?;

    let base = InferenceRequest::parse(&payload).map_err(|e| ApiError::new(e, request_id))?;

    let pipeline = state.pipeline.clone();
    let handle = tokio::task::spawn_blocking(move || -> Result<[f64; 4]> {
        let high_fico = base.clone().with_feature("fico_avg", FeatureValue::Number(780.0));
        let low_fico = base.clone().with_feature("fico_avg", FeatureValue::Number(600.0));
        let high_dti = base.clone().with_feature("dti_capped", FeatureValue::Number(30.0));

        Ok([
            pipeline.score(&base)?.pd,
            pipeline.score(&high_fico)?.pd,
            pipeline.score(&low_fico)?.pd,
            pipeline.score(&high_dti)?.pd,
        ])
    });

    let [pd_base, pd_fico_780, pd_fico_600, pd_dti_30] =
        match tokio::time::timeout(state.config.request_timeout(), handle).await {
            Err(_) => Err(Error::Timeout),
            Ok(Err(join_err)) => Err(Error::internal(format!("scoring task failed: {join_err}"))),
            Ok(Ok(result)) => result,
        }
        .map_err(|e| ApiError::new(e, request_id))?;

    Ok(Json(SanityResponse {
        pd_base: round6(pd_base),
        pd_fico_780: round6(pd_fico_780),
        pd_fico_600: round6(pd_fico_600),
        pd_dti_30: round6(pd_dti_30),
        expected_behavior: SanityExpectations {
            fico_780_should_be_lower_than_base: pd_fico_780 < pd_base,
            fico_600_should_be_higher_than_base: pd_fico_600 > pd_base,
            dti_30_should_be_higher_than_base: pd_dti_30 > pd_base,
        },
    }))
}

/// Run one scoring call off the async workers, bounded by the configured
/// wall-clock deadline. The pipeline has no cancellation hooks; on timeout
/// the blocking task is abandoned and the caller gets a server error.
async fn score_with_deadline(state: &AppState, request: InferenceRequest) -> Result<Prediction> {
    let pipeline = state.pipeline.clone();
    let handle = tokio::task::spawn_blocking(move || pipeline.score(&request));

    match tokio::time::timeout(state.config.request_timeout(), handle).await {
        Err(_) => Err(Error::Timeout),
        Ok(Err(join_err)) => Err(Error::internal(format!("scoring task failed: {join_err}"))),
        Ok(Ok(result)) => result,
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Error wrapper that maps the core taxonomy onto HTTP statuses
#[derive(Debug)]
struct ApiError {
    error: Error,
    request_id: Uuid,
}

impl ApiError {
    fn new(error: Error, request_id: Uuid) -> Self {
        Self { error, request_id }
    }

    fn kind(&self) -> &'static str {
        match &self.error {
            Error::Input(_) | Error::Schema { .. } => "invalid_input",
            Error::Timeout => "timeout",
            _ => "prediction_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let kind = self.kind();
        metrics::counter!("lendscore_errors_total", "kind" => kind).increment(1);

        if status.is_server_error() {
            // Server faults mean a broken deployment, not bad input; these
            // are the lines operators should alert on.
            error!(request_id = %self.request_id, error = %self.error, "scoring failed");
        } else {
            debug!(request_id = %self.request_id, error = %self.error, "request rejected");
        }

        let mut body = json!({
            "error": kind,
            "message": self.error.to_string(),
            "request_id": self.request_id.to_string(),
        });
        if let Error::Schema { field, .. } = &self.error {
            body["field"] = json!(field);
        }

        (status, Json(body)).into_response()
    }
}
