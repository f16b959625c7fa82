//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

use personasense_core::RawRecord;

use crate::AppState;

/// Confidence reported when the model exposes no probability estimates.
const FALLBACK_CONFIDENCE: f64 = 85.0;

/// API error carried to the client as `{detail: ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    fn not_loaded(what: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            detail: format!("{what} not loaded"),
        }
    }

    fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("Prediction failed: {err}"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

/// Banner response for the root route
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Root banner
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "PersonaSense API is running!".to_string(),
    })
}

/// Health probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub target_encoder_loaded: bool,
    pub timestamp: String,
}

/// Health probe; always 200, artifact state in the body
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.pipeline.is_some(),
        target_encoder_loaded: state.encoder.is_some(),
        timestamp: now_iso8601(),
    })
}

/// Successful prediction response
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub confidence: f64,
    pub user_id: String,
    pub timestamp: String,
}

/// Predict personality type from a raw survey record
///
/// Body shape/type violations are client errors, surfaced by the Json
/// rejection before any pipeline work. Missing artifacts are 503; any
/// failure inside the pipeline is 500 with the error text.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawRecord>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(record) = payload?;

    let pipeline = state
        .pipeline
        .as_ref()
        .ok_or_else(|| ApiError::not_loaded("Model"))?;
    let encoder = state
        .encoder
        .as_ref()
        .ok_or_else(|| ApiError::not_loaded("Target encoder"))?;

    let user_id = Uuid::new_v4().to_string();
    let now = Local::now();

    // Best-effort audit of the raw input; never fails the request.
    if let Err(e) = state.audit.record(&user_id, now.date_naive(), &record) {
        tracing::warn!(user_id = %user_id, error = %e, "Audit write failed");
    }

    let encoded = pipeline.predict(&record).map_err(ApiError::internal)?;
    let confidence = match pipeline.predict_proba(&record).map_err(ApiError::internal)? {
        Some(probabilities) => {
            let best = probabilities
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            round2(best * 100.0)
        }
        None => FALLBACK_CONFIDENCE,
    };
    let prediction = encoder
        .decode(encoded)
        .map_err(ApiError::internal)?
        .to_string();

    Ok(Json(PredictionResponse {
        prediction,
        confidence,
        user_id,
        timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    }))
}

fn now_iso8601() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
