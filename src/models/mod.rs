/// ML модели

use ndarray::{Array1, Array2};

use crate::config::{DECISION_TREE_FILE, NEURAL_NETWORK_FILE, RANDOM_FOREST_FILE};
use crate::error::Result;

pub mod decision_tree;
pub mod neural_network;
pub mod random_forest;

pub use decision_tree::DecisionTreeModel;
pub use neural_network::{NeuralNetworkModel, NeuralNetworkParams};
pub use random_forest::RandomForestModel;

/// Бинарный классификатор над масштабированными признаками
pub trait Classifier {
    /// Обучение; `y` содержит метки 0/1
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Число признаков, на которых обучена модель
    fn n_features(&self) -> Option<usize>;

    fn kind(&self) -> ModelKind;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    NeuralNetwork,
    RandomForest,
    DecisionTree,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::NeuralNetwork,
        ModelKind::RandomForest,
        ModelKind::DecisionTree,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::NeuralNetwork => "neural_network",
            ModelKind::RandomForest => "random_forest",
            ModelKind::DecisionTree => "decision_tree",
        }
    }

    pub fn artifact_file(&self) -> &'static str {
        match self {
            ModelKind::NeuralNetwork => NEURAL_NETWORK_FILE,
            ModelKind::RandomForest => RANDOM_FOREST_FILE,
            ModelKind::DecisionTree => DECISION_TREE_FILE,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
