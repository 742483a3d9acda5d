/// Модуль предобработки данных

pub mod dataset;
pub mod encoding;
pub mod normalization;

pub use dataset::{Dataset, TrainTestSplit};
pub use encoding::{encode_cell, normalize_request};
pub use normalization::StandardScaler;
