//! Instafake: classify Instagram accounts as real or fake.
//!
//! Modular structure:
//! - [`features`]: Raw counters → engineered ratio features (serving and training data)
//! - [`model`]: Model store: classifier + feature-column order, loaded once
//! - [`predictor`]: Feature alignment and label mapping
//! - [`fetcher`]: Profile lookup by username
//! - [`api`]: HTTP endpoints
//! - [`logging`]: Structured JSON logging

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod fetcher;
pub mod logging;
pub mod model;
pub mod predictor;

pub use config::AppConfig;
pub use error::{ConfigError, DatasetError, FetchError, ModelLoadError, PredictError};
pub use features::{engineer, EngineeredFeatures, FeatureColumns, RawAccountFeatures};
pub use fetcher::{AccountFetcher, InstagramFetcher};
pub use logging::StructuredLogger;
pub use model::{Classifier, ModelStore};
pub use predictor::{PredictionLabel, Predictor};
