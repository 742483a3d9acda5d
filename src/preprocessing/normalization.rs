//! Стандартизация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// (x - mean) / std по каждому признаку; параметры берутся только из обучающей выборки
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }

        let mean = X.mean_axis(Axis(0)).ok_or(Error::EmptyDataset)?;
        let mut std = X.std_axis(Axis(0), 0.0);

        // Постоянные признаки только центрируются
        for val in std.iter_mut() {
            if *val < 1e-10 {
                *val = 1.0;
            }
        }

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    pub fn n_features(&self) -> Option<usize> {
        self.mean.as_ref().map(|m| m.len())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, std) = self.params()?;
        if X.ncols() != mean.len() {
            return Err(Error::DimensionMismatch {
                expected: mean.len(),
                actual: X.ncols(),
            });
        }

        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / std[i];
            }
        }

        Ok(normalized)
    }

    /// Преобразование одной записи
    pub fn transform_one(&self, x: ArrayView1<f64>) -> Result<Array2<f64>> {
        let row = x.to_owned().insert_axis(Axis(0));
        self.transform(&row)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    fn params(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.mean, &self.std) {
            (Some(mean), Some(std)) => Ok((mean, std)),
            _ => Err(Error::NotFitted("Scaler")),
        }
    }
}
