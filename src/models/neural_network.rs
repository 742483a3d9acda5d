//! Многослойный перцептрон: один скрытый слой ReLU, логистический выход, оптимизатор Adam

#![allow(non_snake_case)]

use ndarray::{Array, Array1, Array2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{Classifier, ModelKind};
use crate::config::RANDOM_SEED;
use crate::error::{Error, Result};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetworkParams {
    pub hidden_size: usize,
    pub learning_rate: f64,
    /// L2-регуляризация
    pub alpha: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    pub tol: f64,
    pub n_iter_no_change: usize,
    pub seed: u64,
}

impl Default for NeuralNetworkParams {
    fn default() -> Self {
        Self {
            hidden_size: 100,
            learning_rate: 1e-3,
            alpha: 1e-4,
            max_epochs: 500,
            batch_size: 200,
            tol: 1e-4,
            n_iter_no_change: 10,
            seed: RANDOM_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layers {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

struct Gradients {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

/// Моменты Adam для одного тензора
struct Moments<D: Dimension> {
    m: Array<f64, D>,
    v: Array<f64, D>,
}

impl<D: Dimension> Moments<D> {
    fn zeros_like(param: &Array<f64, D>) -> Self {
        Self {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn step(&mut self, param: &mut Array<f64, D>, grad: &Array<f64, D>, lr: f64, t: i32) {
        Zip::from(&mut self.m)
            .and(&mut self.v)
            .and(grad)
            .for_each(|m, v, &g| {
                *m = BETA1 * *m + (1.0 - BETA1) * g;
                *v = BETA2 * *v + (1.0 - BETA2) * g * g;
            });

        let lr_t = lr * (1.0 - BETA2.powi(t)).sqrt() / (1.0 - BETA1.powi(t));
        Zip::from(param)
            .and(&self.m)
            .and(&self.v)
            .for_each(|p, &m, &v| *p -= lr_t * m / (v.sqrt() + EPSILON));
    }
}

struct Adam {
    w1: Moments<ndarray::Ix2>,
    b1: Moments<ndarray::Ix1>,
    w2: Moments<ndarray::Ix2>,
    b2: Moments<ndarray::Ix1>,
    t: i32,
}

impl Adam {
    fn new(layers: &Layers) -> Self {
        Self {
            w1: Moments::zeros_like(&layers.w1),
            b1: Moments::zeros_like(&layers.b1),
            w2: Moments::zeros_like(&layers.w2),
            b2: Moments::zeros_like(&layers.b2),
            t: 0,
        }
    }

    fn step(&mut self, layers: &mut Layers, grads: &Gradients, lr: f64) {
        self.t += 1;
        self.w1.step(&mut layers.w1, &grads.w1, lr, self.t);
        self.b1.step(&mut layers.b1, &grads.b1, lr, self.t);
        self.w2.step(&mut layers.w2, &grads.w2, lr, self.t);
        self.b2.step(&mut layers.b2, &grads.b2, lr, self.t);
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Layers {
    /// Инициализация Глорота: равномерное распределение
    fn init(n_inputs: usize, n_hidden: usize, rng: &mut StdRng) -> Self {
        let hidden_bound = (6.0 / (n_inputs + n_hidden) as f64).sqrt();
        let output_bound = (2.0 / (n_hidden + 1) as f64).sqrt();

        let mut uniform = |bound: f64| rng.gen_range(-bound..bound);
        let w1 = Array2::from_shape_fn((n_inputs, n_hidden), |_| uniform(hidden_bound));
        let b1 = Array1::from_shape_fn(n_hidden, |_| uniform(hidden_bound));
        let w2 = Array2::from_shape_fn((n_hidden, 1), |_| uniform(output_bound));
        let b2 = Array1::from_shape_fn(1, |_| uniform(output_bound));

        Self { w1, b1, w2, b2 }
    }

    /// Возвращает (пре-активации скрытого слоя, активации скрытого слоя, вероятности класса 1)
    fn forward(&self, X: &Array2<f64>) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        let z1 = X.dot(&self.w1) + &self.b1;
        let a1 = z1.mapv(|v| v.max(0.0));
        let z2 = a1.dot(&self.w2) + &self.b2;
        let p = z2.mapv(sigmoid);
        (z1, a1, p)
    }

    /// Логистическая функция потерь с L2 и градиенты по батчу
    fn backward(&self, X: &Array2<f64>, y: &Array2<f64>, alpha: f64) -> (f64, Gradients) {
        let m = X.nrows() as f64;
        let (z1, a1, p) = self.forward(X);

        let eps = 1e-15;
        let log_loss = Zip::from(&p)
            .and(y)
            .fold(0.0, |acc, &p, &t| {
                let p = p.clamp(eps, 1.0 - eps);
                acc - (t * p.ln() + (1.0 - t) * (1.0 - p).ln())
            })
            / m;
        let l2 = 0.5 * alpha * (self.w1.mapv(|w| w * w).sum() + self.w2.mapv(|w| w * w).sum()) / m;

        let delta2 = &p - y;
        let w2 = a1.t().dot(&delta2) / m + &self.w2 * (alpha / m);
        let b2 = delta2.sum_axis(Axis(0)) / m;

        let mut delta1 = delta2.dot(&self.w2.t());
        Zip::from(&mut delta1).and(&z1).for_each(|d, &z| {
            if z <= 0.0 {
                *d = 0.0;
            }
        });
        let w1 = X.t().dot(&delta1) / m + &self.w1 * (alpha / m);
        let b1 = delta1.sum_axis(Axis(0)) / m;

        (log_loss + l2, Gradients { w1, b1, w2, b2 })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetworkModel {
    params: NeuralNetworkParams,
    layers: Option<Layers>,
    epochs_run: usize,
}

impl NeuralNetworkModel {
    pub fn new(params: NeuralNetworkParams) -> Self {
        Self {
            params,
            layers: None,
            epochs_run: 0,
        }
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Вероятность класса 1 для каждой строки
    pub fn predict_proba(&self, X: &Array2<f64>) -> Result<Array1<f64>> {
        let layers = self.layers.as_ref().ok_or(Error::NotFitted("Neural network"))?;
        if X.ncols() != layers.w1.nrows() {
            return Err(Error::DimensionMismatch {
                expected: layers.w1.nrows(),
                actual: X.ncols(),
            });
        }

        let (_, _, p) = layers.forward(X);
        Ok(p.column(0).to_owned())
    }
}

impl Default for NeuralNetworkModel {
    fn default() -> Self {
        Self::new(NeuralNetworkParams::default())
    }
}

impl Classifier for NeuralNetworkModel {
    fn fit(&mut self, X: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        let (n_samples, n_features) = X.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(Error::EmptyDataset);
        }
        let params = &self.params;
        if params.hidden_size == 0 || params.batch_size == 0 {
            return Err(Error::Model("hidden_size and batch_size must be positive".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut layers = Layers::init(n_features, params.hidden_size, &mut rng);
        let mut adam = Adam::new(&layers);

        let targets = y.mapv(|v| v as f64).insert_axis(Axis(1));
        let batch_size = params.batch_size.min(n_samples);
        let mut indices: Vec<usize> = (0..n_samples).collect();

        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;
        let mut epochs = 0;

        for _ in 0..params.max_epochs {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in indices.chunks(batch_size) {
                let X_batch = X.select(Axis(0), batch);
                let y_batch = targets.select(Axis(0), batch);
                let (loss, grads) = layers.backward(&X_batch, &y_batch, params.alpha);
                adam.step(&mut layers, &grads, params.learning_rate);
                epoch_loss += loss * batch.len() as f64;
            }

            epochs += 1;
            epoch_loss /= n_samples as f64;

            if epoch_loss > best_loss - params.tol {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            if epoch_loss < best_loss {
                best_loss = epoch_loss;
            }
            if no_improvement > params.n_iter_no_change {
                tracing::debug!("Neural network converged after {} epochs", epochs);
                break;
            }
        }

        if epochs == params.max_epochs {
            tracing::warn!(
                "Neural network reached max_epochs={} without converging",
                params.max_epochs
            );
        }
        tracing::debug!("Neural network final loss: {:.5}", best_loss);

        self.layers = Some(layers);
        self.epochs_run = epochs;
        Ok(())
    }

    fn predict(&self, X: &Array2<f64>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(X)?;
        Ok(proba.mapv(|p| usize::from(p > 0.5)))
    }

    fn n_features(&self) -> Option<usize> {
        self.layers.as_ref().map(|l| l.w1.nrows())
    }

    fn kind(&self) -> ModelKind {
        ModelKind::NeuralNetwork
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_params() -> NeuralNetworkParams {
        NeuralNetworkParams {
            hidden_size: 8,
            learning_rate: 0.05,
            max_epochs: 300,
            ..NeuralNetworkParams::default()
        }
    }

    fn separable() -> (Array2<f64>, Array1<usize>) {
        let X = array![
            [-2.0, -1.0],
            [-1.5, -1.5],
            [-1.0, -0.5],
            [-1.2, -1.1],
            [1.0, 1.2],
            [1.5, 0.8],
            [2.0, 1.5],
            [1.1, 1.9]
        ];
        let y = array![0, 0, 0, 0, 1, 1, 1, 1];
        (X, y)
    }

    #[test]
    fn learns_a_separable_problem() {
        let (X, y) = separable();
        let mut model = NeuralNetworkModel::new(small_params());
        model.fit(&X, &y).unwrap();

        assert_eq!(model.predict(&X).unwrap(), y);
        assert_eq!(model.n_features(), Some(2));
        assert!(model.epochs_run() > 0);
    }

    #[test]
    fn probabilities_are_bounded() {
        let (X, y) = separable();
        let mut model = NeuralNetworkModel::new(small_params());
        model.fit(&X, &y).unwrap();

        let proba = model.predict_proba(&array![[5.0, 5.0], [-5.0, -5.0]]).unwrap();
        assert!(proba[0] > 0.5 && proba[0] <= 1.0);
        assert!(proba[1] < 0.5 && proba[1] >= 0.0);
    }

    #[test]
    fn seeded_training_is_reproducible() {
        let (X, y) = separable();
        let mut a = NeuralNetworkModel::new(small_params());
        let mut b = NeuralNetworkModel::new(small_params());
        a.fit(&X, &y).unwrap();
        b.fit(&X, &y).unwrap();

        assert_eq!(
            a.predict_proba(&X).unwrap(),
            b.predict_proba(&X).unwrap()
        );
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let (X, y) = separable();
        let mut rng = StdRng::seed_from_u64(3);
        let layers = Layers::init(2, 3, &mut rng);
        let targets = y.mapv(|v| v as f64).insert_axis(Axis(1));

        let (_, grads) = layers.backward(&X, &targets, 1e-4);

        let h = 1e-6;
        let mut plus = layers.clone();
        plus.w2[[1, 0]] += h;
        let mut minus = layers.clone();
        minus.w2[[1, 0]] -= h;
        let numeric = (plus.backward(&X, &targets, 1e-4).0 - minus.backward(&X, &targets, 1e-4).0)
            / (2.0 * h);

        assert!((numeric - grads.w2[[1, 0]]).abs() < 1e-5);
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = NeuralNetworkModel::default();
        assert!(matches!(
            model.predict(&array![[0.0]]),
            Err(Error::NotFitted(_))
        ));
    }
}
