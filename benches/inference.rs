//! Inference benchmark: aligned feature row → classifier → label.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use instafake::features::{FeatureColumns, RawAccountFeatures, ENGINEERED_COLUMNS};
use instafake::model::{LogisticRegression, ModelStore};
use instafake::predictor::{PredictionLabel, Predictor};
use std::sync::Arc;

fn predictor(extra_columns: usize) -> Predictor {
    let mut names: Vec<String> = ENGINEERED_COLUMNS.iter().map(|c| c.to_string()).collect();
    names.extend((0..extra_columns).map(|i| format!("unused_{}", i)));
    let model = LogisticRegression {
        coefficients: vec![0.1; names.len()],
        intercept: -1.0,
        threshold: 0.5,
        scaler: None,
    };
    let columns = FeatureColumns::new(names).unwrap();
    Predictor::new(Arc::new(ModelStore::from_parts(
        Box::new(model),
        columns,
        PredictionLabel::Real,
    )))
}

fn sample() -> RawAccountFeatures {
    RawAccountFeatures::from_counts(200, 180, 30, "user_2024_abc123")
}

fn bench_predict(c: &mut Criterion) {
    let p = predictor(0);
    let raw = sample();
    c.bench_function("predict_logistic_8_columns", |b| {
        b.iter(|| p.predict(black_box(&raw)).unwrap())
    });
}

fn bench_predict_defaulted_columns(c: &mut Criterion) {
    let raw = sample();
    let mut g = c.benchmark_group("predict_by_schema_width");
    for extra in [0, 8, 32, 128] {
        let p = predictor(extra);
        g.bench_function(format!("extra_{}", extra).as_str(), |b| {
            b.iter(|| p.predict(black_box(&raw)).unwrap())
        });
    }
    g.finish();
}

criterion_group!(benches, bench_predict, bench_predict_defaulted_columns);
criterion_main!(benches);
