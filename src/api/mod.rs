//! HTTP API
//!
//! ## Endpoints
//!
//! - `GET /` - Liveness message
//! - `GET /health` - Model identity and uptime
//! - `POST /predict/username` - Look up a profile and classify it
//! - `POST /predict/features` - Classify caller-supplied counters
//!
//! ## Example
//!
//! ```rust,ignore
//! let state = AppState::new(predictor, fetcher, &config.fetcher);
//! let app = create_router(state, &config.server);
//! axum::serve(listener, app).await?;
//! ```

mod handlers;
pub mod types;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    config::{FetcherConfig, ServerConfig},
    fetcher::AccountFetcher,
    predictor::Predictor,
};

use handlers::{health_handler, predict_features_handler, predict_username_handler, root_handler};

/// State shared by every handler. Cloning is cheap; the model is never mutated.
#[derive(Clone)]
pub struct AppState {
    predictor: Predictor,
    fetcher: Arc<dyn AccountFetcher>,
    lookup_timeout: Duration,
    collapse_errors: bool,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor, fetcher: Arc<dyn AccountFetcher>, config: &FetcherConfig) -> Self {
        Self {
            predictor,
            fetcher,
            lookup_timeout: config.lookup_timeout(),
            collapse_errors: config.collapse_errors,
            started_at: Utc::now(),
        }
    }
}

/// CORS for the configured origins: GET/POST/OPTIONS, any request header,
/// credentials allowed. Unparseable origins and `*` are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            if o.trim() == "*" {
                warn!(origin = %o, "ignoring wildcard CORS origin; credentials are enabled");
                return None;
            }
            match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // a wildcard is not allowed together with credentials
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/predict/username", post(predict_username_handler))
        .route("/predict/features", post(predict_features_handler))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
