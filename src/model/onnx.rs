//! ONNX Runtime classifier. Input: `[1, n]` f32. Outputs: an int64 label
//! tensor and, optionally, a `[1, 2]` f32 probability tensor (skl2onnx and
//! onnxmltools exports; disable zipmap to get the tensor form).

use super::Classifier;
use crate::error::{ModelLoadError, PredictError};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info, warn};

pub struct OnnxClassifier {
    // `Session::run` takes `&mut self`
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: Option<String>,
}

fn load_err(e: impl std::fmt::Display) -> ModelLoadError {
    ModelLoadError::Onnx(e.to_string())
}

fn run_err(e: impl std::fmt::Display) -> PredictError {
    PredictError::Inference(e.to_string())
}

impl OnnxClassifier {
    pub fn load(path: &Path, threads: usize) -> Result<Self, ModelLoadError> {
        let session = Session::builder()
            .map_err(load_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(load_err)?
            .with_intra_threads(threads.max(1))
            .map_err(load_err)?
            .commit_from_file(path)
            .map_err(load_err)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let is_tensor = |ty: &ValueType, want: TensorElementType| {
            matches!(ty, ValueType::Tensor { ty, .. } if *ty == want)
        };

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| {
                session
                    .outputs
                    .iter()
                    .find(|o| is_tensor(&o.output_type, TensorElementType::Int64))
            })
            .ok_or_else(|| ModelLoadError::Onnx("model declares no label output".to_string()))?;
        if !is_tensor(&label_output.output_type, TensorElementType::Int64) {
            return Err(ModelLoadError::Onnx(format!(
                "label output {:?} is not an int64 tensor",
                label_output.name
            )));
        }
        let label_output = label_output.name.clone();

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .and_then(|o| {
                if is_tensor(&o.output_type, TensorElementType::Float32) {
                    Some(o.name.clone())
                } else {
                    // zipmap exports give seq(map); probabilities are then unknown
                    warn!(output = %o.name, "probability output is not a float tensor, ignoring it");
                    None
                }
            });

        info!(
            path = %path.display(),
            input = %input_name,
            label = %label_output,
            probability = ?probability_output,
            "onnx classifier loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        })
    }

    /// Run one row and read the label and, when present, the class-1 probability.
    fn run(&self, row: &[f32]) -> Result<(i64, Option<f32>), PredictError> {
        let shape = vec![1_i64, row.len() as i64];
        let input = Tensor::from_array((shape, row.to_vec())).map_err(run_err)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::Inference("onnx session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input])
            .map_err(run_err)?;

        let label = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| PredictError::Inference(format!("missing output {}", self.label_output)))?;
        let (_, labels) = label.try_extract_tensor::<i64>().map_err(run_err)?;
        let class = labels
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference("empty label tensor".to_string()))?;

        let probability = self
            .probability_output
            .as_deref()
            .and_then(|name| outputs.get(name))
            .and_then(|v| v.try_extract_tensor::<f32>().ok())
            .and_then(|(_, data)| match data.len() {
                0 => None,
                1 => Some(data[0]),
                _ => Some(data[1]),
            });

        debug!(class, probability = ?probability, "onnx inference");
        Ok((class, probability))
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict(&self, row: &[f32]) -> Result<i64, PredictError> {
        self.run(row).map(|(class, _)| class)
    }

    fn predict_proba(&self, row: &[f32]) -> Result<Option<f32>, PredictError> {
        self.run(row).map(|(_, p)| p)
    }

    fn predict_with_proba(&self, row: &[f32]) -> Result<(i64, Option<f32>), PredictError> {
        self.run(row)
    }
}
