//! Logistic regression stored inline in the manifest (optionally behind a
//! standard scaler). No runtime dependency; handy for small exported models.

use super::Classifier;
use crate::error::{ModelLoadError, PredictError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Class 1 when the probability is strictly above this.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
}

fn default_threshold() -> f64 {
    0.5
}

impl LogisticRegression {
    pub(crate) fn check_dim(&self, dim: usize) -> Result<(), ModelLoadError> {
        let mut parts = vec![("coefficients", self.coefficients.len())];
        if let Some(s) = &self.scaler {
            parts.push(("scaler mean", s.mean.len()));
            parts.push(("scaler scale", s.scale.len()));
        }
        for (what, got) in parts {
            if got != dim {
                return Err(ModelLoadError::DimensionMismatch {
                    what,
                    expected: dim,
                    got,
                });
            }
        }
        Ok(())
    }

    fn probability(&self, row: &[f32]) -> Result<f64, PredictError> {
        if row.len() != self.coefficients.len() {
            return Err(PredictError::Inference(format!(
                "row has {} values, model has {} coefficients",
                row.len(),
                self.coefficients.len()
            )));
        }
        let mut z = self.intercept;
        for (i, (&x, &w)) in row.iter().zip(&self.coefficients).enumerate() {
            let mut x = f64::from(x);
            if let Some(s) = &self.scaler {
                // zero variance columns are left unscaled
                let scale = if s.scale[i] == 0.0 { 1.0 } else { s.scale[i] };
                x = (x - s.mean[i]) / scale;
            }
            z += w * x;
        }
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticRegression {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict(&self, row: &[f32]) -> Result<i64, PredictError> {
        self.predict_with_proba(row).map(|(class, _)| class)
    }

    fn predict_proba(&self, row: &[f32]) -> Result<Option<f32>, PredictError> {
        Ok(Some(self.probability(row)? as f32))
    }

    fn predict_with_proba(&self, row: &[f32]) -> Result<(i64, Option<f32>), PredictError> {
        let p = self.probability(row)?;
        Ok((i64::from(p > self.threshold), Some(p as f32)))
    }
}
