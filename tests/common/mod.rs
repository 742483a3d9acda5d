#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use cardio_risk::{training, Config, FeatureRecord, PredictionContext};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cardio_fixture.csv")
}

pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cardio-risk-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

pub fn fixture_config(name: &str) -> Config {
    Config::default()
        .with_dataset_path(fixture_path())
        .with_artifacts_dir(temp_dir(name))
}

/// Контекст, обученный на фикстуре один раз на тестовый бинарник
pub fn trained_context() -> Arc<PredictionContext> {
    static CONTEXT: OnceLock<Arc<PredictionContext>> = OnceLock::new();
    CONTEXT
        .get_or_init(|| {
            let config = fixture_config("shared");
            training::run(&config).expect("training on fixture");
            let context = PredictionContext::load(&config.artifacts_dir).expect("load artifacts");
            Arc::new(context)
        })
        .clone()
}

pub fn record(values: &[(&str, f64)]) -> FeatureRecord {
    let mut record = FeatureRecord::default();
    for (name, value) in values {
        assert!(record.set(name, *value), "unknown feature {}", name);
    }
    record
}

pub fn at_risk_probe() -> serde_json::Value {
    serde_json::json!({
        "sex": 1,
        "age": 66,
        "education": 2,
        "cigarettes_per_day": 20,
        "blood_pressure_medications": 0,
        "prevalent_stroke": 0,
        "prevalent_hypertension": 1,
        "diabetes": 0,
        "cholesterol": 280,
        "bmi": 31.0,
        "heart_rate": 85,
        "glucose": 140,
        "pulse_pressure": 80
    })
}

pub fn healthy_probe() -> serde_json::Value {
    serde_json::json!({
        "sex": 0,
        "age": 40,
        "education": 3,
        "cigarettes_per_day": 0,
        "blood_pressure_medications": 0,
        "prevalent_stroke": 0,
        "prevalent_hypertension": 0,
        "diabetes": 0,
        "cholesterol": 190,
        "bmi": 22.5,
        "heart_rate": 68,
        "glucose": 78,
        "pulse_pressure": 38
    })
}
