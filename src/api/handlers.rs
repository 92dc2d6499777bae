use std::time::Instant;

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::types::{
    ApiError, FeaturesPredictionResponse, HealthResponse, MessageResponse, ModelInfo,
    UsernamePredictionResponse, UsernameRequest,
};
use super::AppState;
use crate::error::FetchError;
use crate::features::RawAccountFeatures;
use crate::predictor::{PredictionLabel, Predictor};

/// Run the classifier on the blocking pool; ONNX inference holds a session lock.
async fn predict_blocking(
    predictor: Predictor,
    raw: RawAccountFeatures,
) -> Result<PredictionLabel, ApiError> {
    tokio::task::spawn_blocking(move || predictor.predict(&raw))
        .await
        .map_err(ApiError::from)?
        .map_err(ApiError::from)
}

pub(super) async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Instagram Fake Account Detector API".to_string(),
    })
}

pub(super) async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.predictor.store();
    Json(HealthResponse {
        status: "ok".to_string(),
        model: ModelInfo {
            kind: store.kind().to_string(),
            fingerprint: store.fingerprint().to_string(),
            feature_columns: store.feature_columns().iter().map(str::to_string).collect(),
        },
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
    })
}

pub(super) async fn predict_username_handler(
    State(state): State<AppState>,
    Json(request): Json<UsernameRequest>,
) -> Result<Json<UsernamePredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let lookup = tokio::time::timeout(state.lookup_timeout, state.fetcher.fetch(&request.username))
        .await
        .unwrap_or(Err(FetchError::Timeout));
    let raw = match lookup {
        Ok(raw) => raw,
        Err(e) => {
            warn!(%request_id, username = %request.username, error = %e, "account lookup failed");
            return Err(ApiError::lookup(&e, state.collapse_errors));
        }
    };

    let prediction = predict_blocking(state.predictor.clone(), raw).await?;
    info!(
        %request_id,
        username = %request.username,
        prediction = %prediction,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "predicted by username"
    );
    Ok(Json(UsernamePredictionResponse {
        username: request.username,
        prediction,
    }))
}

pub(super) async fn predict_features_handler(
    State(state): State<AppState>,
    Json(raw): Json<RawAccountFeatures>,
) -> Result<Json<FeaturesPredictionResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let start = Instant::now();
    let prediction = predict_blocking(state.predictor.clone(), raw).await?;
    info!(
        %request_id,
        prediction = %prediction,
        elapsed_us = start.elapsed().as_micros() as u64,
        "predicted by features"
    );
    Ok(Json(FeaturesPredictionResponse { prediction }))
}
