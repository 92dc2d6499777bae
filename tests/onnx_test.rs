//! ONNX backend against small exported logistic-regression graphs in
//! `tests/fixtures/`:
//!
//! - `logistic.onnx`: `float_input [N, 8]` → `label` (int64 `[N]`) and
//!   `probabilities` (float `[N, 2]`), the zipmap-free export layout.
//! - `zipmap.onnx`: same model, `output_label` plus `output_probability` as
//!   seq(map(int64, float)), the default export layout.
//! - `probability_only.onnx`: `probabilities` only, no label output.
//!
//! Every graph computes `sigmoid(4 * followers_following_ratio - 4)`.

use instafake::{
    config::ModelConfig,
    features::{FeatureColumns, RawAccountFeatures, ENGINEERED_COLUMNS},
    model::{LogisticRegression, ModelStore},
    predictor::{PredictionLabel, Predictor},
    ModelLoadError,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn write_manifest(dir: &Path, onnx: &str) -> PathBuf {
    let path = dir.join("instafake.json");
    let manifest = json!({
        "feature_columns": ENGINEERED_COLUMNS,
        "classifier": { "kind": "onnx", "path": fixture(onnx) }
    });
    std::fs::write(&path, serde_json::to_vec_pretty(&manifest).unwrap()).unwrap();
    path
}

fn load(onnx: &str) -> Result<ModelStore, ModelLoadError> {
    let dir = tempfile::tempdir().unwrap();
    ModelStore::load(&write_manifest(dir.path(), onnx), &ModelConfig::default())
}

fn inline_predictor() -> Predictor {
    let mut coefficients = vec![0.0; ENGINEERED_COLUMNS.len()];
    coefficients[5] = 4.0;
    let model = LogisticRegression {
        coefficients,
        intercept: -4.0,
        threshold: 0.5,
        scaler: None,
    };
    let columns =
        FeatureColumns::new(ENGINEERED_COLUMNS.iter().map(|c| c.to_string()).collect()).unwrap();
    Predictor::new(Arc::new(ModelStore::from_parts(
        Box::new(model),
        columns,
        PredictionLabel::Real,
    )))
}

fn account(followers: u64, following: u64) -> RawAccountFeatures {
    RawAccountFeatures::from_counts(followers, following, 30, "jane.doe_1987")
}

#[test]
fn exported_model_labels_and_probabilities() {
    let store = load("logistic.onnx").unwrap();
    assert_eq!(store.kind(), "onnx");
    assert_eq!(store.fingerprint().len(), 64);
    let predictor = Predictor::new(Arc::new(store));

    assert_eq!(predictor.predict(&account(200, 180)).unwrap(), PredictionLabel::Real);
    assert_eq!(predictor.predict(&account(10, 900)).unwrap(), PredictionLabel::Fake);

    // sigmoid(4 * 200/181 - 4)
    let scored = predictor.score(&account(200, 180)).unwrap();
    assert_eq!(scored.prediction, PredictionLabel::Real);
    assert!((scored.probability.unwrap() - 0.60346).abs() < 1e-4);
    assert!(scored.defaulted_columns.is_empty());
}

#[test]
fn exported_model_agrees_with_inline_model() {
    let onnx = Predictor::new(Arc::new(load("logistic.onnx").unwrap()));
    let inline = inline_predictor();

    for (followers, following) in [(0, 0), (1, 0), (181, 180), (200, 180), (5, 5000), (3_000_000, 12)] {
        let raw = account(followers, following);
        let a = onnx.score(&raw).unwrap();
        let b = inline.score(&raw).unwrap();
        assert_eq!(a.prediction, b.prediction, "{followers}/{following}");
        let (pa, pb) = (a.probability.unwrap(), b.probability.unwrap());
        assert!((pa - pb).abs() < 1e-5, "{followers}/{following}: {pa} vs {pb}");
    }
}

#[test]
fn zipmap_export_predicts_without_probability() {
    let predictor = Predictor::new(Arc::new(load("zipmap.onnx").unwrap()));
    assert_eq!(predictor.predict(&account(200, 180)).unwrap(), PredictionLabel::Real);
    assert_eq!(predictor.predict(&account(10, 900)).unwrap(), PredictionLabel::Fake);

    let scored = predictor.score(&account(10, 900)).unwrap();
    assert_eq!(scored.prediction, PredictionLabel::Fake);
    assert_eq!(scored.probability, None);
}

#[test]
fn export_without_label_output_is_rejected_at_load() {
    assert!(matches!(
        load("probability_only.onnx"),
        Err(ModelLoadError::Onnx(_))
    ));
}
