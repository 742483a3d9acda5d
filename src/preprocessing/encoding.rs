//! Кодирование значений: ячейки датасета и поля JSON-запроса

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::types::{FeatureRecord, FEATURE_NAMES, SELECTOR_KEY};

/// Кодирование ячейки CSV. `None` означает нераспознанное значение.
///
/// Пропуски заменяются на 0, бинарные категории переводятся в 1/0.
pub fn encode_cell(raw: &str) -> Option<f64> {
    let cell = raw.trim();
    match cell {
        "" | "NA" | "NaN" | "nan" | "null" => Some(0.0),
        "Male" | "YES" | "Yes" => Some(1.0),
        "Female" | "NO" | "No" => Some(0.0),
        _ => cell.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Приведение тела запроса к 13 признакам.
///
/// Селектор модели удаляется, лишние поля отбрасываются, отсутствующие равны 0.
pub fn normalize_request(body: &Value) -> Result<FeatureRecord> {
    let object = body
        .as_object()
        .ok_or_else(|| Error::InvalidRequest("expected a JSON object".to_string()))?;

    let mut fields = object.clone();
    fields.remove(SELECTOR_KEY);
    normalize_fields(&fields)
}

fn normalize_fields(fields: &Map<String, Value>) -> Result<FeatureRecord> {
    let mut record = FeatureRecord::default();

    for name in FEATURE_NAMES {
        if let Some(value) = fields.get(name) {
            record.set(name, feature_value(name, value)?);
        }
    }

    Ok(record)
}

fn feature_value(name: &str, value: &Value) -> Result<f64> {
    let invalid = |reason: &str| Error::InvalidFeature {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("number out of range")),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(&format!("could not convert string to float: '{}'", s))),
        Value::Null => Err(invalid("value is null")),
        Value::Array(_) | Value::Object(_) => Err(invalid("expected a number")),
    }
}
