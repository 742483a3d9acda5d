//! Случайный лес: бэггинг деревьев решений на случайных подмножествах признаков

#![allow(non_snake_case)]

use linfa::prelude::*;
use linfa_tree::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{seq::index, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::decision_tree::fit_tree;
use super::{Classifier, ModelKind};
use crate::config::RANDOM_SEED;
use crate::error::{Error, Result};

/// Дерево леса и индексы признаков, на которых оно обучено
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForestMember {
    features: Vec<usize>,
    tree: DecisionTree<f64, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestModel {
    n_trees: usize,
    seed: u64,
    members: Vec<ForestMember>,
    n_features: Option<usize>,
}

impl RandomForestModel {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            members: Vec::new(),
            n_features: None,
        }
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    fn features_per_tree(n_features: usize) -> usize {
        ((n_features as f64).sqrt().round() as usize).clamp(1, n_features)
    }
}

impl Default for RandomForestModel {
    fn default() -> Self {
        Self::new(100, RANDOM_SEED)
    }
}

impl Classifier for RandomForestModel {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        let (n_samples, n_features) = X.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(Error::EmptyDataset);
        }
        if self.n_trees == 0 {
            return Err(Error::Model("random forest needs at least one tree".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let k = Self::features_per_tree(n_features);
        let mut members = Vec::with_capacity(self.n_trees);

        for _ in 0..self.n_trees {
            // Bootstrap-выборка строк
            let rows: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

            let mut features = index::sample(&mut rng, n_features, k).into_vec();
            features.sort_unstable();

            let X_sub = X.select(Axis(0), &rows).select(Axis(1), &features);
            let y_sub = y.select(Axis(0), &rows);
            let tree = fit_tree(&X_sub, &y_sub)?;

            members.push(ForestMember { features, tree });
        }

        self.members = members;
        self.n_features = Some(n_features);
        tracing::debug!("Random forest trained: {} trees, {} features per tree", self.n_trees, k);
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<usize>> {
        if self.members.is_empty() {
            return Err(Error::NotFitted("Random forest"));
        }
        let expected = self.n_features.unwrap_or_default();
        if X.ncols() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: X.ncols(),
            });
        }

        let mut votes = Array1::<usize>::zeros(X.nrows());
        for member in &self.members {
            let X_sub = X.select(Axis(1), &member.features);
            let predicted: Array1<usize> = member.tree.predict(&X_sub);
            votes += &predicted;
        }

        // Для класса 1 нужно строгое большинство
        let n_members = self.members.len();
        Ok(votes.mapv(|v| usize::from(v * 2 > n_members)))
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }
}
