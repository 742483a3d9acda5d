//! Конфигурация: фиксированные значения по умолчанию и переопределения из окружения

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASET_PATH: &str = "data_cardiovascular_risk.csv";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_PORT: u16 = 5001;

pub const SCALER_FILE: &str = "scaler.json";
pub const NEURAL_NETWORK_FILE: &str = "neural_network_model.json";
pub const RANDOM_FOREST_FILE: &str = "random_forest_model.json";
pub const DECISION_TREE_FILE: &str = "decision_tree_model.json";

pub const LABEL_COLUMN: &str = "TenYearCHD";
pub const RANDOM_SEED: u64 = 42;
pub const TEST_FRACTION: f64 = 0.2;

const ENV_DATASET: &str = "CARDIO_RISK_DATASET";
const ENV_ARTIFACTS_DIR: &str = "CARDIO_RISK_ARTIFACTS_DIR";
const ENV_ADDR: &str = "CARDIO_RISK_ADDR";

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub artifacts_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub seed: u64,
    pub test_fraction: f64,
}

impl Config {
    /// Значения по умолчанию с учетом переменных окружения
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var(ENV_DATASET) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var(ENV_ARTIFACTS_DIR) {
            config.artifacts_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var(ENV_ADDR) {
            config.bind_addr = addr
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid {}='{}': {}", ENV_ADDR, addr, e))?;
        }

        Ok(config)
    }

    pub fn with_artifacts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.artifacts_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_dataset_path(mut self, path: impl AsRef<Path>) -> Self {
        self.dataset_path = path.as_ref().to_path_buf();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            seed: RANDOM_SEED,
            test_fraction: TEST_FRACTION,
        }
    }
}
