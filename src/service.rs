//! Сервис предсказаний: загруженные один раз артефакты и HTTP API поверх них

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use ndarray::Array1;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::artifacts::ArtifactSet;
use crate::error::{Error, Result};
use crate::models::Classifier;
use crate::preprocessing::normalize_request;
use crate::types::{ErrorOutput, FeatureRecord, PredictionOutput, RiskLabel};

pub const SERVICE_NAME: &str = "Cardiovascular Risk Prediction API";

/// Неизменяемый контекст: скейлер и три модели, общие для всех запросов
#[derive(Debug)]
pub struct PredictionContext {
    artifacts: ArtifactSet,
}

impl PredictionContext {
    pub fn new(artifacts: ArtifactSet) -> Result<Self> {
        artifacts.validate()?;
        Ok(Self { artifacts })
    }

    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Self::new(ArtifactSet::load(dir)?)
    }

    /// Масштабирование и три независимых предсказания
    pub fn score(&self, record: &FeatureRecord) -> Result<PredictionOutput> {
        let scaled = self.artifacts.scaler.transform_one(record.to_array().view())?;

        let neural_network = first_label(self.artifacts.neural_network.predict(&scaled)?)?;
        let random_forest = first_label(self.artifacts.random_forest.predict(&scaled)?)?;
        let decision_tree = first_label(self.artifacts.decision_tree.predict(&scaled)?)?;

        Ok(PredictionOutput {
            neural_network_prediction: RiskLabel::from_class(neural_network),
            random_forest_prediction: RiskLabel::from_class(random_forest),
            decision_tree_prediction: RiskLabel::from_class(decision_tree),
        })
    }

    /// Тело запроса -> нормализация -> предсказания
    pub fn predict(&self, body: &Value) -> Result<PredictionOutput> {
        let record = normalize_request(body)?;
        self.score(&record)
    }
}

fn first_label(predictions: Array1<usize>) -> Result<usize> {
    predictions
        .get(0)
        .copied()
        .ok_or_else(|| Error::Model("empty prediction".to_string()))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorOutput { error: self.to_string() })).into_response()
    }
}

pub fn router(context: Arc<PredictionContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(cors)
        .with_state(context)
}

async fn root() -> &'static str {
    SERVICE_NAME
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn predict(
    State(context): State<Arc<PredictionContext>>,
    body: Bytes,
) -> std::result::Result<Json<PredictionOutput>, Error> {
    let outcome = serde_json::from_slice::<Value>(&body)
        .map_err(|e| Error::InvalidRequest(e.to_string()))
        .and_then(|value| context.predict(&value));

    match outcome {
        Ok(output) => {
            tracing::info!(
                "Predict: nn={} rf={} dt={}",
                output.neural_network_prediction,
                output.random_forest_prediction,
                output.decision_tree_prediction
            );
            Ok(Json(output))
        }
        Err(e) => {
            tracing::warn!("Predict failed: {}", e);
            Err(e)
        }
    }
}
