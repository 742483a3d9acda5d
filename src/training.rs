//! Пайплайн обучения: датасет -> скейлер + три модели -> файлы артефактов

use crate::artifacts::ArtifactSet;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Classifier, DecisionTreeModel, NeuralNetworkModel, NeuralNetworkParams, RandomForestModel};
use crate::preprocessing::{Dataset, StandardScaler};

pub const SUCCESS_MESSAGE: &str = "Models and scaler saved successfully!";

/// Обучение на уже загруженном датасете, без записи на диск
pub fn train(dataset: &Dataset, config: &Config) -> Result<ArtifactSet> {
    let split = dataset.train_test_split(config.test_fraction, config.seed);
    tracing::info!(
        "Split {} rows: {} train, {} held out",
        dataset.n_samples(),
        split.train.n_samples(),
        split.test.n_samples()
    );

    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&split.train.features)?;
    let x_test = scaler.transform(&split.test.features)?;
    tracing::debug!("Held-out matrix scaled: {:?}", x_test.dim());

    let y_train = &split.train.labels;

    let mut neural_network = NeuralNetworkModel::new(NeuralNetworkParams {
        seed: config.seed,
        ..NeuralNetworkParams::default()
    });
    neural_network.fit(&x_train, y_train)?;
    tracing::info!("Neural network trained ({} epochs)", neural_network.epochs_run());

    let mut random_forest = RandomForestModel::new(100, config.seed);
    random_forest.fit(&x_train, y_train)?;
    tracing::info!("Random forest trained ({} trees)", random_forest.n_trees());

    let mut decision_tree = DecisionTreeModel::new();
    decision_tree.fit(&x_train, y_train)?;
    tracing::info!("Decision tree trained");

    Ok(ArtifactSet {
        scaler,
        neural_network,
        random_forest,
        decision_tree,
    })
}

/// Полный прогон: чтение CSV, обучение и запись четырех артефактов
pub fn run(config: &Config) -> Result<ArtifactSet> {
    tracing::info!("Loading dataset from {}", config.dataset_path.display());
    let dataset = Dataset::from_csv_path(&config.dataset_path)?;

    let artifacts = train(&dataset, config)?;
    artifacts.save(&config.artifacts_dir)?;
    tracing::info!("Artifacts saved to {}", config.artifacts_dir.display());

    Ok(artifacts)
}
