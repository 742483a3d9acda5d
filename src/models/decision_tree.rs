//! Дерево решений (CART, критерий Джини)

#![allow(non_snake_case)]

use linfa::prelude::*;
use linfa_tree::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelKind};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionTreeModel {
    tree: Option<DecisionTree<f64, usize>>,
    n_features: Option<usize>,
}

impl DecisionTreeModel {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Обучение одного дерева без ограничения глубины; используется и в случайном лесе
pub(crate) fn fit_tree(X: &Array2<f64>, y: &Array1<usize>) -> Result<DecisionTree<f64, usize>> {
    if X.nrows() == 0 {
        return Err(Error::EmptyDataset);
    }

    let dataset = linfa::Dataset::new(X.clone(), y.clone());
    DecisionTree::<f64, usize>::params()
        .split_quality(SplitQuality::Gini)
        .max_depth(None)
        .fit(&dataset)
        .map_err(|e| Error::Model(format!("decision tree: {}", e)))
}

impl Classifier for DecisionTreeModel {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        self.tree = Some(fit_tree(X, y)?);
        self.n_features = Some(X.ncols());
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<usize>> {
        let tree = self.tree.as_ref().ok_or(Error::NotFitted("Decision tree"))?;
        let expected = self.n_features.unwrap_or_default();
        if X.ncols() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: X.ncols(),
            });
        }

        Ok(tree.predict(X))
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn kind(&self) -> ModelKind {
        ModelKind::DecisionTree
    }
}
