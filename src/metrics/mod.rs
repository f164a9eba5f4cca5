//! Evaluation metrics for fitted estimators.
//!
//! Regression metrics (R², MSE, MAE) and classification accuracy. All
//! metrics take `(y_pred, y_true)` in that order and fail instead of
//! returning NaN or infinity.

use crate::error::{Result, YlearnError};
use crate::primitives::Vector;

fn check_aligned(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<()> {
    if y_pred.len() != y_true.len() {
        return Err(YlearnError::dimension_mismatch(
            "n_samples",
            y_true.len(),
            y_pred.len(),
        ));
    }
    if y_true.is_empty() {
        return Err(YlearnError::empty_input("metric targets"));
    }
    Ok(())
}

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// where `SS_res` is the residual sum of squares and `SS_tot` is the total
/// sum of squares about the mean of `y_true`.
///
/// # Examples
///
/// ```
/// use ylearn::metrics::r_squared;
/// use ylearn::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Vector::from_slice(&[2.5, 0.0, 2.0, 8.0]);
/// let r2 = r_squared(&y_pred, &y_true).unwrap();
/// assert!(r2 > 0.9);
/// ```
///
/// # Errors
///
/// Fails on length mismatch, empty input, or when `y_true` is constant
/// (`SS_tot` = 0), where R² is undefined.
pub fn r_squared(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_aligned(y_pred, y_true)?;

    let y_mean = y_true.mean();

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Err(YlearnError::UndefinedMetric {
            metric: "R²",
            reason: "true targets have zero variance".to_string(),
        });
    }

    Ok(1.0 - (ss_res / ss_tot))
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true` - `y_pred)²`
///
/// # Errors
///
/// Fails on length mismatch or empty input.
pub fn mse(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_aligned(y_pred, y_true)?;

    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    Ok(sum_sq_error / y_true.len() as f64)
}

/// Computes the Mean Absolute Error (MAE).
///
/// # Errors
///
/// Fails on length mismatch or empty input.
pub fn mae(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_aligned(y_pred, y_true)?;

    let sum_abs_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();

    Ok(sum_abs_error / y_true.len() as f64)
}

/// Fraction of predictions exactly equal to the true labels, in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use ylearn::metrics::accuracy;
/// use ylearn::primitives::Vector;
///
/// let y_true = Vector::from_slice(&[0.0, 1.0, 2.0, 0.0]);
/// let y_pred = Vector::from_slice(&[0.0, 2.0, 2.0, 0.0]);
/// assert!((accuracy(&y_pred, &y_true).unwrap() - 0.75).abs() < 1e-12);
/// ```
///
/// # Errors
///
/// Fails on length mismatch or empty input.
#[allow(clippy::float_cmp)]
pub fn accuracy(y_pred: &Vector<f64>, y_true: &Vector<f64>) -> Result<f64> {
    check_aligned(y_pred, y_true)?;

    let correct = y_pred
        .iter()
        .zip(y_true.iter())
        .filter(|(p, t)| p == t)
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}
