mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cardio_risk::service::{router, SERVICE_NAME};
use cardio_risk::PredictionContext;

use common::{at_risk_probe, healthy_probe};

const PREDICTION_KEYS: [&str; 3] = [
    "neural_network_prediction",
    "random_forest_prediction",
    "decision_tree_prediction",
];

fn app() -> Router {
    router(common::trained_context())
}

async fn post_predict(body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::post("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn predict_json(body: Value) -> (StatusCode, Value) {
    post_predict(serde_json::to_vec(&body).unwrap()).await
}

fn assert_full_prediction(json: &Value) {
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3, "unexpected fields: {}", json);
    for key in PREDICTION_KEYS {
        let label = object[key].as_str().unwrap();
        assert!(label == "At Risk" || label == "No Risk", "{} = {}", key, label);
    }
}

fn assert_error_only(json: &Value) {
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 1, "unexpected fields: {}", json);
    assert!(object["error"].is_string());
}

#[tokio::test]
async fn root_identifies_service() {
    let req = Request::get("/").body(Body::empty()).unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], SERVICE_NAME.as_bytes());
}

#[tokio::test]
async fn health_is_ok() {
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_record_returns_three_predictions() {
    let (status, json) = predict_json(at_risk_probe()).await;
    assert_eq!(status, StatusCode::OK);
    assert_full_prediction(&json);
    assert_eq!(
        json,
        json!({
            "neural_network_prediction": "At Risk",
            "random_forest_prediction": "At Risk",
            "decision_tree_prediction": "At Risk"
        })
    );

    let (_, json) = predict_json(healthy_probe()).await;
    assert_eq!(json["decision_tree_prediction"], "No Risk");
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let (_, first) = predict_json(at_risk_probe()).await;
    let (_, second) = predict_json(at_risk_probe()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_fields_equal_explicit_zeros() {
    let partial = json!({ "age": 52, "cholesterol": 233, "bmi": 27.4 });
    let mut explicit = json!({
        "sex": 0, "age": 52, "education": 0, "cigarettes_per_day": 0,
        "blood_pressure_medications": 0, "prevalent_stroke": 0,
        "prevalent_hypertension": 0, "diabetes": 0, "cholesterol": 233,
        "bmi": 27.4, "heart_rate": 0, "glucose": 0
    });
    explicit["pulse_pressure"] = json!(0);

    let (status, a) = predict_json(partial).await;
    let (_, b) = predict_json(explicit).await;
    assert_eq!(status, StatusCode::OK);
    assert_full_prediction(&a);
    assert_eq!(a, b);
}

#[tokio::test]
async fn empty_object_still_returns_three_predictions() {
    let (status, json) = predict_json(json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_full_prediction(&json);
}

#[tokio::test]
async fn selector_and_unknown_fields_are_ignored() {
    let mut noisy = healthy_probe();
    noisy["model_type"] = json!("random_forest");
    noisy["favourite_colour"] = json!("blue");

    let (_, plain) = predict_json(healthy_probe()).await;
    let (status, with_extra) = predict_json(noisy).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plain, with_extra);
}

#[tokio::test]
async fn non_numeric_value_returns_error_only() {
    let mut body = at_risk_probe();
    body["glucose"] = json!("high");

    let (status, json) = predict_json(body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_only(&json);
    assert!(json["error"].as_str().unwrap().contains("glucose"));
}

#[tokio::test]
async fn malformed_bodies_return_error_only() {
    for body in ["not json", "[1, 2, 3]", "42"] {
        let (status, json) = post_predict(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_error_only(&json);
    }
}

#[test]
fn context_scores_records_directly() {
    let context: std::sync::Arc<PredictionContext> = common::trained_context();
    let record = common::record(&[("age", 66.0), ("cholesterol", 280.0)]);
    let output = context.score(&record).unwrap();
    let json = serde_json::to_value(output).unwrap();
    assert_full_prediction(&json);
}
