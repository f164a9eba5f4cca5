//! Core trait for supervised estimators.
//!
//! Every learner in the crate implements the same fit/predict/score
//! lifecycle, whether it trains lazily (neighbors) or eagerly (linear).

use crate::error::Result;
use crate::metrics::r_squared;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised learning estimators.
///
/// `fit` moves an estimator from untrained to trained; calling it again
/// replaces the trained state. `predict` and `score` fail with
/// [`YlearnError::NotFitted`](crate::error::YlearnError::NotFitted) before
/// the first successful `fit`.
///
/// # Examples
///
/// ```
/// use ylearn::prelude::*;
///
/// // y = 2x + 1
/// let x_train = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y_train = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let x_test = Matrix::from_vec(2, 1, vec![5.0, 6.0]).unwrap();
/// let y_test = Vector::from_slice(&[11.0, 13.0]);
///
/// let mut model = Ols::new();
/// let score = model.fit(&x_train, &y_train).unwrap().score(&x_test, &y_test).unwrap();
/// assert!(score > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data and returns the trained estimator.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, singular matrix, etc.).
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self>;

    /// Predicts one target value per row of `x`, in row order.
    ///
    /// # Errors
    ///
    /// Returns an error if the estimator is not fitted or `x` has the wrong
    /// number of features.
    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>>;

    /// Scores predictions on `x` against `y`. Higher is better.
    ///
    /// Defaults to R²; classifiers override with accuracy.
    ///
    /// # Errors
    ///
    /// Propagates prediction errors and fails when the metric is undefined.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        r_squared(&y_pred, y)
    }
}
