//! K-nearest-neighbors estimators.
//!
//! [`NeighborEngine`] is a lazy learner: `fit` only copies the training set,
//! and every query is answered by an exhaustive scan over it. The
//! classifier and regressor differ only in how they aggregate the targets of
//! the `k` selected neighbors.
//!
//! # Selection order
//!
//! Neighbors are ranked by ascending Euclidean distance; equal distances
//! keep training-set order, so the lower training index wins. Results are
//! reproducible across runs and, with the `parallel` feature, across thread
//! counts.
//!
//! # Example
//!
//! ```
//! use ylearn::prelude::*;
//!
//! let x = Matrix::from_vec(6, 2, vec![
//!     0.0, 0.0,  // class 0
//!     0.0, 1.0,  // class 0
//!     1.0, 0.0,  // class 0
//!     5.0, 5.0,  // class 1
//!     5.0, 6.0,  // class 1
//!     6.0, 5.0,  // class 1
//! ]).unwrap();
//! let y = Vector::from_slice(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
//!
//! let mut knn = KNeighborsClassifier::new(3).unwrap();
//! knn.fit(&x, &y).unwrap();
//!
//! let test = Matrix::from_vec(1, 2, vec![0.5, 0.5]).unwrap();
//! assert_eq!(knn.predict(&test).unwrap()[0], 0.0);
//! ```

use crate::distance::euclidean;
use crate::error::{Result, YlearnError};
use crate::metrics::accuracy;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A selected training point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row index in the training matrix.
    pub index: usize,
    /// Euclidean distance to the query.
    pub distance: f64,
}

fn by_distance_then_index(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}

/// Shared storage and neighbor search for KNN estimators.
///
/// Deserialization runs the same checks as [`NeighborEngine::new`] and
/// [`NeighborEngine::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineState")]
pub struct NeighborEngine {
    k: usize,
    x_train: Option<Matrix<f64>>,
    y_train: Option<Vector<f64>>,
}

#[derive(Deserialize)]
struct EngineState {
    k: usize,
    x_train: Option<Matrix<f64>>,
    y_train: Option<Vector<f64>>,
}

impl TryFrom<EngineState> for NeighborEngine {
    type Error = YlearnError;

    fn try_from(state: EngineState) -> Result<Self> {
        let mut engine = Self::new(state.k)?;
        match (state.x_train, state.y_train) {
            (None, None) => {}
            (Some(x), Some(y)) => {
                if x.as_slice().len() != x.n_rows() * x.n_cols() {
                    return Err(YlearnError::dimension_mismatch(
                        "training data length",
                        x.n_rows() * x.n_cols(),
                        x.as_slice().len(),
                    ));
                }
                engine.check_training_set(&x, &y)?;
                engine.x_train = Some(x);
                engine.y_train = Some(y);
            }
            _ => {
                return Err(YlearnError::Serialization(
                    "training features and targets must be stored together".to_string(),
                ));
            }
        }
        Ok(engine)
    }
}

impl NeighborEngine {
    /// Creates an untrained engine selecting `k` neighbors per query.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::InvalidHyperparameter`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(YlearnError::InvalidHyperparameter {
                param: "k".to_string(),
                value: k.to_string(),
                constraint: ">= 1".to_string(),
            });
        }
        Ok(Self {
            k,
            x_train: None,
            y_train: None,
        })
    }

    /// Number of neighbors consulted per query.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns true once training data has been stored.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.x_train.is_some()
    }

    /// Number of stored training samples, 0 before fit.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.x_train.as_ref().map_or(0, Matrix::n_rows)
    }

    /// Stores a copy of the training set. No distances are computed here.
    ///
    /// # Errors
    ///
    /// Fails on empty or misaligned data, and when `k` exceeds the number
    /// of training samples.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        self.check_training_set(x, y)?;
        self.x_train = Some(x.clone());
        self.y_train = Some(y.clone());
        Ok(())
    }

    fn check_training_set(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<()> {
        let n_samples = x.n_rows();

        if n_samples == 0 {
            return Err(YlearnError::empty_input("training data"));
        }
        if y.len() != n_samples {
            return Err(YlearnError::dimension_mismatch(
                "n_samples",
                n_samples,
                y.len(),
            ));
        }
        if self.k > n_samples {
            return Err(YlearnError::InvalidHyperparameter {
                param: "k".to_string(),
                value: self.k.to_string(),
                constraint: format!("<= number of training samples ({n_samples})"),
            });
        }
        Ok(())
    }

    fn training_set(&self, estimator: &'static str) -> Result<(&Matrix<f64>, &Vector<f64>)> {
        match (&self.x_train, &self.y_train) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(YlearnError::NotFitted { estimator }),
        }
    }

    fn check_query(x_train: &Matrix<f64>, x: &Matrix<f64>) -> Result<()> {
        if x.n_cols() != x_train.n_cols() {
            return Err(YlearnError::dimension_mismatch(
                "n_features",
                x_train.n_cols(),
                x.n_cols(),
            ));
        }
        Ok(())
    }

    /// Exhaustive scan: the `k` closest training rows to `query`.
    fn nearest(&self, x_train: &Matrix<f64>, query: &[f64]) -> Vec<Neighbor> {
        let mut candidates: Vec<Neighbor> = x_train
            .rows()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: euclidean(query, row),
            })
            .collect();

        if self.k < candidates.len() {
            candidates.select_nth_unstable_by(self.k - 1, by_distance_then_index);
            candidates.truncate(self.k);
        }
        candidates.sort_unstable_by(by_distance_then_index);
        candidates
    }

    /// The `k` nearest training points for every row of `x`, closest first.
    ///
    /// # Errors
    ///
    /// Fails if the engine is not fitted or `x` has the wrong number of
    /// features.
    pub fn kneighbors(&self, x: &Matrix<f64>) -> Result<Vec<Vec<Neighbor>>> {
        let (x_train, _) = self.training_set("NeighborEngine")?;
        Self::check_query(x_train, x)?;
        Ok(x.rows().map(|query| self.nearest(x_train, query)).collect())
    }

    /// Predicts each row of `x` by handing its neighbors' targets to
    /// `aggregate`.
    ///
    /// # Errors
    ///
    /// Fails if the engine is not fitted or `x` has the wrong number of
    /// features.
    pub fn predict_with<F>(
        &self,
        x: &Matrix<f64>,
        estimator: &'static str,
        aggregate: F,
    ) -> Result<Vector<f64>>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        let (x_train, y_train) = self.training_set(estimator)?;
        Self::check_query(x_train, x)?;
        log::trace!(
            "{estimator} predicting {} queries against {} training rows (k={})",
            x.n_rows(),
            x_train.n_rows(),
            self.k
        );

        let predict_row = |query: &[f64]| {
            let targets: Vec<f64> = self
                .nearest(x_train, query)
                .iter()
                .map(|n| y_train[n.index])
                .collect();
            aggregate(&targets)
        };

        #[cfg(feature = "parallel")]
        let predictions: Vec<f64> = {
            use rayon::prelude::*;
            (0..x.n_rows())
                .into_par_iter()
                .map(|i| predict_row(x.row_slice(i)))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let predictions: Vec<f64> = x.rows().map(predict_row).collect();

        Ok(Vector::from_vec(predictions))
    }
}

/// Majority vote; ties go to the lowest label code.
fn majority_vote(labels: &[f64]) -> f64 {
    // Bit patterns of non-negative floats sort like the values. Adding 0.0
    // folds -0.0 into 0.0.
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry((label + 0.0).to_bits()).or_insert(0) += 1;
    }

    let mut winner = (0_u64, 0_usize);
    for (&bits, &count) in &counts {
        if count > winner.1 {
            winner = (bits, count);
        }
    }
    f64::from_bits(winner.0)
}

/// Label codes must be finite non-negative integers.
fn check_labels(y: &Vector<f64>) -> Result<()> {
    match y
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v >= 0.0 && v.fract() == 0.0))
    {
        Some((index, &value)) => Err(YlearnError::InvalidLabel { index, value }),
        None => Ok(()),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// K-nearest-neighbors classifier.
///
/// Targets are label codes: non-negative integers stored as `f64`.
/// Predictions are the majority label among the `k` nearest training
/// points, with vote ties resolved toward the lowest label code. Scored by
/// accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClassifierState")]
pub struct KNeighborsClassifier {
    engine: NeighborEngine,
}

#[derive(Deserialize)]
struct ClassifierState {
    engine: NeighborEngine,
}

impl TryFrom<ClassifierState> for KNeighborsClassifier {
    type Error = YlearnError;

    fn try_from(state: ClassifierState) -> Result<Self> {
        if let Some(y) = &state.engine.y_train {
            check_labels(y)?;
        }
        Ok(Self {
            engine: state.engine,
        })
    }
}

impl KNeighborsClassifier {
    /// Creates a new K-Nearest Neighbors classifier.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::InvalidHyperparameter`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        Ok(Self {
            engine: NeighborEngine::new(k)?,
        })
    }

    /// Number of neighbors consulted per query.
    #[must_use]
    pub fn k(&self) -> usize {
        self.engine.k()
    }

    /// Returns true once training data has been stored.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.engine.is_fitted()
    }

    /// Underlying neighbor search.
    #[must_use]
    pub fn engine(&self) -> &NeighborEngine {
        &self.engine
    }
}

impl Estimator for KNeighborsClassifier {
    /// Stores the training data after checking every label is a
    /// non-negative integer.
    ///
    /// # Errors
    ///
    /// Fails on invalid labels and on any [`NeighborEngine::fit`] error.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self> {
        check_labels(y)?;
        self.engine.fit(x, y)?;
        log::debug!(
            "KNeighborsClassifier fitted: n_samples={}, n_features={}, k={}",
            x.n_rows(),
            x.n_cols(),
            self.engine.k()
        );
        Ok(self)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.engine
            .predict_with(x, "KNeighborsClassifier", majority_vote)
    }

    /// Accuracy of the predicted labels.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        accuracy(&y_pred, y)
    }
}

/// K-nearest-neighbors regressor.
///
/// Predictions are the arithmetic mean of the `k` nearest training targets.
/// Scored by R².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KNeighborsRegressor {
    engine: NeighborEngine,
}

impl KNeighborsRegressor {
    /// Creates a new K-Nearest Neighbors regressor.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::InvalidHyperparameter`] if `k == 0`.
    pub fn new(k: usize) -> Result<Self> {
        Ok(Self {
            engine: NeighborEngine::new(k)?,
        })
    }

    /// Number of neighbors consulted per query.
    #[must_use]
    pub fn k(&self) -> usize {
        self.engine.k()
    }

    /// Returns true once training data has been stored.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.engine.is_fitted()
    }

    /// Underlying neighbor search.
    #[must_use]
    pub fn engine(&self) -> &NeighborEngine {
        &self.engine
    }
}

impl Estimator for KNeighborsRegressor {
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self> {
        self.engine.fit(x, y)?;
        log::debug!(
            "KNeighborsRegressor fitted: n_samples={}, n_features={}, k={}",
            x.n_rows(),
            x.n_cols(),
            self.engine.k()
        );
        Ok(self)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.engine.predict_with(x, "KNeighborsRegressor", mean)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
