/// Типы данных для сервиса оценки риска

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Порядок признаков, одинаковый при обучении и при предсказании
pub const FEATURE_NAMES: [&str; 13] = [
    "sex",
    "age",
    "education",
    "cigarettes_per_day",
    "blood_pressure_medications",
    "prevalent_stroke",
    "prevalent_hypertension",
    "diabetes",
    "cholesterol",
    "bmi",
    "heart_rate",
    "glucose",
    "pulse_pressure",
];

pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Ключ-селектор, который клиент может прислать вместе с признаками
pub const SELECTOR_KEY: &str = "model_type";

/// Один пациент: 13 числовых признаков в фиксированном порядке
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    values: [f64; N_FEATURES],
}

impl FeatureRecord {
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|f| *f == name)
            .map(|i| self.values[i])
    }

    pub fn set(&mut self, name: &str, value: f64) -> bool {
        match FEATURE_NAMES.iter().position(|f| *f == name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn values(&self) -> &[f64; N_FEATURES] {
        &self.values
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.values.to_vec())
    }
}

impl Default for FeatureRecord {
    /// Все признаки равны 0, как для полей, отсутствующих в запросе
    fn default() -> Self {
        Self {
            values: [0.0; N_FEATURES],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "No Risk")]
    NoRisk,
}

impl RiskLabel {
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            RiskLabel::AtRisk
        } else {
            RiskLabel::NoRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::AtRisk => "At Risk",
            RiskLabel::NoRisk => "No Risk",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ответ `/predict`: все три предсказания или ничего
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub neural_network_prediction: RiskLabel,
    pub random_forest_prediction: RiskLabel,
    pub decision_tree_prediction: RiskLabel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error: String,
}
