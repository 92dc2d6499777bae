//! Raw features → engineered features → aligned row → label.

use crate::error::PredictError;
use crate::features::{engineer, AlignedRow, RawAccountFeatures};
use crate::model::ModelStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Binary verdict returned to callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionLabel {
    #[default]
    Real,
    Fake,
}

impl PredictionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionLabel::Real => "real",
            PredictionLabel::Fake => "fake",
        }
    }

    fn other(self) -> Self {
        match self {
            PredictionLabel::Real => PredictionLabel::Fake,
            PredictionLabel::Fake => PredictionLabel::Real,
        }
    }

    /// Map a classifier class to a label. `positive` is what class 1 means
    /// for this artifact; class 0 is the other label.
    pub fn from_class(class: i64, positive: PredictionLabel) -> Result<Self, PredictError> {
        match class {
            1 => Ok(positive),
            0 => Ok(positive.other()),
            other => Err(PredictError::UnexpectedClass(other)),
        }
    }
}

impl std::fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full prediction detail, used by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub prediction: PredictionLabel,
    /// Probability of class 1, when the classifier exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
    /// Model columns that had no engineered value and were set to 0.
    pub defaulted_columns: Vec<String>,
}

#[derive(Clone)]
pub struct Predictor {
    store: Arc<ModelStore>,
}

impl Predictor {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn predict(&self, raw: &RawAccountFeatures) -> Result<PredictionLabel, PredictError> {
        let row = self.align(raw);
        let class = self.store.classifier().predict(&row.values)?;
        PredictionLabel::from_class(class, self.store.positive_label())
    }

    pub fn score(&self, raw: &RawAccountFeatures) -> Result<Prediction, PredictError> {
        let row = self.align(raw);
        let (class, probability) = self.store.classifier().predict_with_proba(&row.values)?;
        Ok(Prediction {
            prediction: PredictionLabel::from_class(class, self.store.positive_label())?,
            probability,
            defaulted_columns: row.defaulted,
        })
    }

    fn align(&self, raw: &RawAccountFeatures) -> AlignedRow {
        let engineered = engineer(raw);
        let row = self.store.feature_columns().align(|c| engineered.get(c));
        if !row.defaulted.is_empty() {
            debug!(columns = ?row.defaulted, "feature columns missing from input, set to 0");
        }
        row
    }
}
