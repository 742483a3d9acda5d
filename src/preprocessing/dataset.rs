//! Загрузка размеченного датасета и разбиение на train/test

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::encoding::encode_cell;
use crate::config::LABEL_COLUMN;
use crate::error::{Error, Result};
use crate::types::{FEATURE_NAMES, N_FEATURES};

/// Допустимые заголовки для каждого признака, в порядке `FEATURE_NAMES`
const COLUMN_ALIASES: [&[&str]; N_FEATURES] = [
    &["sex"],
    &["age"],
    &["education"],
    &["cigsPerDay", "cigarettes_per_day"],
    &["BPMeds", "blood_pressure_medications"],
    &["prevalentStroke", "prevalent_stroke"],
    &["prevalentHyp", "prevalent_hypertension"],
    &["diabetes"],
    &["totChol", "cholesterol"],
    &["BMI", "bmi"],
    &["heartRate", "heart_rate"],
    &["glucose"],
    &["pulse_pressure"],
];

const SYSTOLIC_COLUMN: &str = "sysBP";
const DIASTOLIC_COLUMN: &str = "diaBP";

/// Откуда берется значение признака в строке CSV
#[derive(Debug, Clone, Copy)]
enum ColumnSource {
    Column(usize),
    /// Пульсовое давление: sysBP - diaBP
    Difference(usize, usize),
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array1<usize>,
}

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h == name);

        let label_idx = find(LABEL_COLUMN).ok_or_else(|| Error::MissingColumn(LABEL_COLUMN.to_string()))?;

        let mut sources = Vec::with_capacity(N_FEATURES);
        for (name, aliases) in FEATURE_NAMES.iter().zip(COLUMN_ALIASES) {
            let source = match aliases.iter().find_map(|&a| find(a)) {
                Some(idx) => ColumnSource::Column(idx),
                None if *name == "pulse_pressure" => {
                    match (find(SYSTOLIC_COLUMN), find(DIASTOLIC_COLUMN)) {
                        (Some(sys), Some(dia)) => ColumnSource::Difference(sys, dia),
                        _ => return Err(Error::MissingColumn(name.to_string())),
                    }
                }
                None => return Err(Error::MissingColumn(name.to_string())),
            };
            sources.push(source);
        }

        let mut values = Vec::new();
        let mut labels = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let row = row + 1;

            let cell = |idx: usize| -> Result<f64> {
                let raw = record.get(idx).unwrap_or("");
                encode_cell(raw).ok_or_else(|| Error::InvalidCell {
                    row,
                    column: headers.get(idx).unwrap_or_default().to_string(),
                    value: raw.to_string(),
                })
            };

            for source in &sources {
                let value = match *source {
                    ColumnSource::Column(idx) => cell(idx)?,
                    ColumnSource::Difference(a, b) => cell(a)? - cell(b)?,
                };
                values.push(value);
            }

            let label = cell(label_idx)?;
            if label != 0.0 && label != 1.0 {
                return Err(Error::InvalidCell {
                    row,
                    column: LABEL_COLUMN.to_string(),
                    value: record.get(label_idx).unwrap_or("").to_string(),
                });
            }
            labels.push(label as usize);
        }

        if labels.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let features = Array2::from_shape_vec((labels.len(), N_FEATURES), values)
            .map_err(|e| Error::Model(e.to_string()))?;

        Ok(Self {
            features,
            labels: Array1::from(labels),
        })
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }

    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }

    /// Перемешивание с фиксированным seed и разбиение; в train остается хотя бы одна строка
    pub fn train_test_split(&self, test_fraction: f64, seed: u64) -> TrainTestSplit {
        let n = self.n_samples();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let n_test = ((n as f64 * test_fraction).ceil() as usize).min(n.saturating_sub(1));
        let (train_idx, test_idx) = indices.split_at(n - n_test);

        TrainTestSplit {
            train: self.select(train_idx),
            test: self.select(test_idx),
        }
    }
}
