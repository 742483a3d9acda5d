//! Ошибки библиотеки

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}' in dataset")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Model error: {0}")]
    Model(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Artifact '{}': {source}", .path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid value for feature '{name}': {reason}")]
    InvalidFeature { name: String, reason: String },

    #[error("Expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("{0} is not fitted")]
    NotFitted(&'static str),
}

impl Error {
    /// Ошибка вызвана содержимым запроса, а не состоянием сервиса
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRequest(_) | Error::InvalidFeature { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::InvalidCell {
            row: 3,
            column: "BMI".to_string(),
            value: "heavy".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value 'heavy' in column 'BMI' at row 3");

        let err = Error::DimensionMismatch {
            expected: 13,
            actual: 12,
        };
        assert_eq!(err.to_string(), "Expected 13 features, got 12");
    }

    #[test]
    fn client_errors() {
        assert!(Error::InvalidRequest("x".into()).is_client_error());
        assert!(!Error::NotFitted("Scaler").is_client_error());
        assert!(!Error::MissingColumn("TenYearCHD".into()).is_client_error());
    }
}
