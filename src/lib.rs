//! Cardio Risk - обучение классификаторов сердечно-сосудистого риска и API предсказаний

pub mod artifacts;
pub mod config;
pub mod error;
pub mod models;
pub mod preprocessing;
pub mod service;
pub mod training;
pub mod types;

pub use artifacts::ArtifactSet;
pub use config::Config;
pub use error::{Error, Result};
pub use service::PredictionContext;
pub use types::*;

use tracing_subscriber::EnvFilter;

/// Логирование для бинарников: фильтр из `RUST_LOG`, по умолчанию `info`
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
