//! Хранение обученных артефактов: скейлер и три модели, по одному JSON-файлу

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::SCALER_FILE;
use crate::error::{Error, Result};
use crate::models::{Classifier, DecisionTreeModel, ModelKind, NeuralNetworkModel, RandomForestModel};
use crate::preprocessing::StandardScaler;
use crate::types::N_FEATURES;

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub scaler: StandardScaler,
    pub neural_network: NeuralNetworkModel,
    pub random_forest: RandomForestModel,
    pub decision_tree: DecisionTreeModel,
}

impl ArtifactSet {
    pub fn classifiers(&self) -> [&dyn Classifier; 3] {
        [&self.neural_network as &dyn Classifier, &self.random_forest, &self.decision_tree]
    }

    /// Все артефакты обучены на одном и том же числе признаков
    pub fn validate(&self) -> Result<()> {
        let scaler_features = self.scaler.n_features().ok_or(Error::NotFitted("Scaler"))?;
        if scaler_features != N_FEATURES {
            return Err(Error::DimensionMismatch {
                expected: N_FEATURES,
                actual: scaler_features,
            });
        }

        for model in self.classifiers() {
            match model.n_features() {
                Some(n) if n == N_FEATURES => {}
                Some(n) => {
                    return Err(Error::DimensionMismatch {
                        expected: N_FEATURES,
                        actual: n,
                    })
                }
                None => return Err(Error::Model(format!("{} is not fitted", model.kind()))),
            }
        }

        Ok(())
    }

    /// Запись всех четырех файлов.
    ///
    /// Сначала пишутся временные файлы, затем они переименовываются поверх старых.
    /// Если запись не удалась, прежние артефакты остаются нетронутыми.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| Error::ArtifactIo {
            path: dir.to_path_buf(),
            source,
        })?;

        let payloads = [
            (SCALER_FILE, to_json(&self.scaler)?),
            (ModelKind::NeuralNetwork.artifact_file(), to_json(&self.neural_network)?),
            (ModelKind::RandomForest.artifact_file(), to_json(&self.random_forest)?),
            (ModelKind::DecisionTree.artifact_file(), to_json(&self.decision_tree)?),
        ];

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(payloads.len());
        for (name, bytes) in &payloads {
            let target = dir.join(name);
            let tmp = target.with_extension(TMP_SUFFIX);
            if let Err(source) = fs::write(&tmp, bytes) {
                discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(Error::ArtifactIo { path: tmp, source });
            }
            staged.push((tmp, target));
        }

        for (committed, (tmp, target)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(tmp, target) {
                discard(&staged[committed..]);
                tracing::error!(
                    "Artifact set in {} is inconsistent: {} of {} files replaced before {} failed",
                    dir.display(),
                    committed,
                    staged.len(),
                    target.display()
                );
                return Err(Error::ArtifactIo {
                    path: target.clone(),
                    source,
                });
            }
            tracing::debug!("Artifact written: {}", target.display());
        }

        Ok(())
    }

    /// Загрузка всех четырех файлов; любой сбой фатален
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let set = Self {
            scaler: from_json_file(&dir.join(SCALER_FILE))?,
            neural_network: from_json_file(&dir.join(ModelKind::NeuralNetwork.artifact_file()))?,
            random_forest: from_json_file(&dir.join(ModelKind::RandomForest.artifact_file()))?,
            decision_tree: from_json_file(&dir.join(ModelKind::DecisionTree.artifact_file()))?,
        };
        set.validate()?;

        tracing::info!("Loaded scaler and {} models from {}", ModelKind::ALL.len(), dir.display());
        Ok(set)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn from_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|source| Error::ArtifactIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}
