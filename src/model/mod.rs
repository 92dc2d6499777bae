//! Model store: the classifier and the feature-column order it was trained on,
//! loaded once from a JSON manifest and shared read-only afterwards.

mod linear;
mod onnx;

pub use linear::{LogisticRegression, StandardScaler};
pub use onnx::OnnxClassifier;

use crate::config::ModelConfig;
use crate::error::{ModelLoadError, PredictError};
use crate::features::FeatureColumns;
use crate::predictor::PredictionLabel;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

/// Binary classifier over one aligned feature row.
pub trait Classifier: Send + Sync {
    /// Short backend name for logs and `/health`.
    fn kind(&self) -> &'static str;

    /// Class for the row: 0 or 1 for a well-formed artifact.
    fn predict(&self, row: &[f32]) -> Result<i64, PredictError>;

    /// Probability of class 1, if the backend exposes one.
    fn predict_proba(&self, _row: &[f32]) -> Result<Option<f32>, PredictError> {
        Ok(None)
    }

    /// Class and class-1 probability together. Backends where an evaluation
    /// is expensive answer both from a single run.
    fn predict_with_proba(&self, row: &[f32]) -> Result<(i64, Option<f32>), PredictError> {
        Ok((self.predict(row)?, self.predict_proba(row)?))
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    feature_columns: FeatureColumns,
    #[serde(default)]
    positive_label: PredictionLabel,
    classifier: ClassifierSpec,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierSpec {
    Onnx { path: PathBuf },
    LogisticRegression(LogisticRegression),
}

pub struct ModelStore {
    classifier: Box<dyn Classifier>,
    feature_columns: FeatureColumns,
    positive_label: PredictionLabel,
    fingerprint: String,
}

impl ModelStore {
    /// Load the manifest and its classifier. Any failure is fatal to startup.
    pub fn load(manifest_path: &Path, config: &ModelConfig) -> Result<Self, ModelLoadError> {
        let bytes = read(manifest_path)?;
        let manifest: Manifest =
            serde_json::from_slice(&bytes).map_err(|source| ModelLoadError::Manifest {
                path: manifest_path.to_path_buf(),
                source,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        let dim = manifest.feature_columns.len();
        let classifier: Box<dyn Classifier> = match manifest.classifier {
            ClassifierSpec::Onnx { path } => {
                let path = match manifest_path.parent() {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                };
                hasher.update(read(&path)?);
                Box::new(OnnxClassifier::load(&path, config.onnx_threads)?)
            }
            ClassifierSpec::LogisticRegression(model) => {
                model.check_dim(dim)?;
                Box::new(model)
            }
        };

        let store = Self {
            classifier,
            feature_columns: manifest.feature_columns,
            positive_label: manifest.positive_label,
            fingerprint: format!("{:x}", hasher.finalize()),
        };
        info!(
            path = %manifest_path.display(),
            kind = store.kind(),
            columns = dim,
            positive_label = %store.positive_label,
            fingerprint = %store.fingerprint,
            "model loaded"
        );
        Ok(store)
    }

    /// Assemble a store from an already-built classifier.
    pub fn from_parts(
        classifier: Box<dyn Classifier>,
        feature_columns: FeatureColumns,
        positive_label: PredictionLabel,
    ) -> Self {
        Self {
            classifier,
            feature_columns,
            positive_label,
            fingerprint: String::new(),
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_columns(&self) -> &FeatureColumns {
        &self.feature_columns
    }

    /// Label that class 1 stands for.
    pub fn positive_label(&self) -> PredictionLabel {
        self.positive_label
    }

    pub fn kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// SHA-256 of the manifest and model bytes; empty for in-memory stores.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ModelLoadError> {
    std::fs::read(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
