//! Request and response bodies, and the error body every failure uses.

use crate::error::{FetchError, PredictError};
use crate::predictor::PredictionLabel;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Detail returned for every collapsed lookup failure.
pub const NOT_FOUND_DETAIL: &str = "Username not found or private.";

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernamePredictionResponse {
    pub username: String,
    pub prediction: PredictionLabel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeaturesPredictionResponse {
    pub prediction: PredictionLabel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub kind: String,
    pub fingerprint: String,
    pub feature_columns: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: ModelInfo,
    pub uptime_secs: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Handler failure: a status plus a human-readable detail.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    /// Map a lookup failure. With `collapse` every cause is the same 404.
    pub fn lookup(err: &FetchError, collapse: bool) -> Self {
        let status = match err {
            _ if collapse => StatusCode::NOT_FOUND,
            FetchError::NotFound => StatusCode::NOT_FOUND,
            FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            FetchError::Transient(_) => StatusCode::BAD_GATEWAY,
        };
        let detail = if status == StatusCode::NOT_FOUND {
            NOT_FOUND_DETAIL.to_string()
        } else {
            err.to_string()
        };
        Self { status, detail }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("prediction failed: {err}"),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("prediction task failed: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}
