//! Linear models for regression.
//!
//! [`Ols`] and [`Ridge`] share one fit/predict pipeline ([`LinearModel`]) and
//! differ only in the regularization strength and default solver strategy
//! they hand to it. The coefficient computation itself is delegated to a
//! [`LinearSolver`](solver::LinearSolver) picked from the [`solver`] registry.

pub mod solver;

use crate::error::{Result, YlearnError};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solver::SolverKind;
use std::fs;
use std::path::Path;

/// Shared state and pipeline for linear estimators.
///
/// On fit, optionally prepends a column of ones to `X`, solves
/// `(X^T X + λI) w = X^T y` with the configured strategy, then splits `w`
/// into the intercept (first element, when enabled) and the feature
/// coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    solver: SolverKind,
    lambda: f64,
    fit_intercept: bool,
    /// Coefficients for features (excluding intercept). `None` until fitted.
    coefficients: Option<Vector<f64>>,
    intercept: f64,
}

impl LinearModel {
    fn new(solver: SolverKind, lambda: f64) -> Self {
        Self {
            solver,
            lambda,
            fit_intercept: true,
            coefficients: None,
            intercept: 0.0,
        }
    }

    /// Solver strategy used by `fit`.
    #[must_use]
    pub fn solver(&self) -> SolverKind {
        self.solver
    }

    /// Regularization strength passed to the solver.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Whether an intercept column is prepended to the design matrix.
    #[must_use]
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Feature coefficients (excluding intercept), `None` before fit.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.coefficients.as_ref()
    }

    /// Intercept term; 0.0 when not fitted or fitted without intercept.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Rejects persisted state `fit` could not have produced.
    fn check_loaded(&self) -> Result<()> {
        let mut fitted_values = self
            .coefficients
            .iter()
            .flat_map(Vector::iter)
            .chain(std::iter::once(&self.intercept));
        if fitted_values.any(|v| !v.is_finite()) {
            return Err(YlearnError::Serialization(
                "stored coefficients must be finite".to_string(),
            ));
        }
        if !self.fit_intercept && self.intercept != 0.0 {
            return Err(YlearnError::Serialization(format!(
                "intercept {} stored for a model fitted without intercept",
                self.intercept
            )));
        }
        Ok(())
    }

    /// Adds an intercept column of ones to the design matrix.
    fn add_intercept_column(x: &Matrix<f64>) -> Matrix<f64> {
        let (n_rows, n_cols) = x.shape();
        let mut design = Matrix::zeros(n_rows, n_cols + 1);

        for (i, row) in x.rows().enumerate() {
            design.set(i, 0, 1.0);
            for (j, &value) in row.iter().enumerate() {
                design.set(i, j + 1, value);
            }
        }

        design
    }

    fn design(&self, x: &Matrix<f64>) -> Matrix<f64> {
        if self.fit_intercept {
            Self::add_intercept_column(x)
        } else {
            x.clone()
        }
    }

    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>, estimator: &'static str) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err(YlearnError::dimension_mismatch(
                "n_samples",
                n_samples,
                y.len(),
            ));
        }
        if n_samples == 0 {
            return Err(YlearnError::empty_input("training data"));
        }

        let x_design = self.design(x);
        let beta = self.solver.solver().solve(&x_design, y, self.lambda)?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(beta.slice(1, n_features + 1));
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }

        log::debug!(
            "{estimator} fitted: n_samples={n_samples}, n_features={n_features}, solver={}, lambda={}, intercept={}",
            self.solver,
            self.lambda,
            self.intercept
        );
        Ok(())
    }

    fn predict(&self, x: &Matrix<f64>, estimator: &'static str) -> Result<Vector<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or(YlearnError::NotFitted { estimator })?;

        if x.n_cols() != coefficients.len() {
            return Err(YlearnError::dimension_mismatch(
                "n_features",
                coefficients.len(),
                x.n_cols(),
            ));
        }

        log::trace!("{estimator} predicting {} rows", x.n_rows());
        Ok(x.matvec(coefficients)?.add_scalar(self.intercept))
    }
}

fn save_model<T: Serialize, P: AsRef<Path>>(model: &T, path: P) -> Result<()> {
    let bytes = bincode::serialize(model)?;
    fs::write(path, bytes)?;
    Ok(())
}

fn load_model<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed targets and predicted targets:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Solver
///
/// Defaults to the `"qr"` strategy (`X = QR`, solve `R β = Q^T y`).
///
/// # Examples
///
/// ```
/// use ylearn::prelude::*;
///
/// // y = 2x
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);
///
/// let mut model = Ols::new();
/// model.fit(&x, &y).unwrap();
///
/// let x_new = Matrix::from_vec(1, 1, vec![5.0]).unwrap();
/// let pred = model.predict(&x_new).unwrap();
/// assert!((pred[0] - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ols {
    model: LinearModel,
}

impl Default for Ols {
    fn default() -> Self {
        Self::new()
    }
}

impl Ols {
    /// Creates an unfitted OLS model with the `"qr"` solver and an intercept.
    #[must_use]
    pub fn new() -> Self {
        Self {
            model: LinearModel::new(SolverKind::Qr, 0.0),
        }
    }

    /// Selects the solver strategy by registry name.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::UnknownSolver`] for unregistered names.
    pub fn with_solver(self, name: &str) -> Result<Self> {
        Ok(self.with_solver_kind(name.parse()?))
    }

    /// Selects the solver strategy.
    #[must_use]
    pub fn with_solver_kind(mut self, solver: SolverKind) -> Self {
        self.model.solver = solver;
        self
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.model.fit_intercept = fit_intercept;
        self
    }

    /// Shared linear state (solver, coefficients, intercept).
    #[must_use]
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Returns the coefficients (excluding intercept), `None` before fit.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.model.coefficients()
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_model(self, path)
    }

    /// Loads a model from a binary file.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails, the
    /// stored `lambda` is not 0, or the stored state is inconsistent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ols: Self = load_model(path)?;
        if ols.model.lambda != 0.0 {
            return Err(YlearnError::InvalidHyperparameter {
                param: "lambda".to_string(),
                value: ols.model.lambda.to_string(),
                constraint: "== 0 (use Ridge for lambda > 0)".to_string(),
            });
        }
        ols.model.check_loaded()?;
        Ok(ols)
    }
}

impl Estimator for Ols {
    /// Fits by solving the unregularized least-squares problem.
    ///
    /// # Errors
    ///
    /// Returns an error if input dimensions don't match, the data is empty,
    /// or the selected solver meets a singular system.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self> {
        self.model.fit(x, y, "Ols")?;
        Ok(self)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.model.predict(x, "Ols")
    }
}

/// Ridge regression (L2-regularized least squares).
///
/// Solves `(X^T X + λI) β = X^T y` with `λ > 0`. Every column of the design
/// matrix is penalized, the intercept column included. Use [`Ols`] for
/// `λ = 0`.
///
/// # Examples
///
/// ```
/// use ylearn::prelude::*;
///
/// assert!(Ridge::new(0.0).is_err());
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0]);
///
/// let mut ridge = Ridge::new(2.5).unwrap();
/// ridge.fit(&x, &y).unwrap();
/// assert!(ridge.coefficients().unwrap()[0] < 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ridge {
    model: LinearModel,
}

fn validate_lambda(lambda: f64) -> Result<f64> {
    if lambda.is_finite() && lambda > 0.0 {
        Ok(lambda)
    } else {
        Err(YlearnError::InvalidHyperparameter {
            param: "lambda".to_string(),
            value: lambda.to_string(),
            constraint: "> 0 (use Ols for lambda = 0)".to_string(),
        })
    }
}

impl Ridge {
    /// Creates an unfitted Ridge model with the `"qr_ridge"` solver and an
    /// intercept.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::InvalidHyperparameter`] unless `lambda` is
    /// finite and strictly positive.
    pub fn new(lambda: f64) -> Result<Self> {
        Ok(Self {
            model: LinearModel::new(SolverKind::QrRidge, validate_lambda(lambda)?),
        })
    }

    /// Selects the solver strategy by registry name.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::UnknownSolver`] for unregistered names.
    pub fn with_solver(self, name: &str) -> Result<Self> {
        Ok(self.with_solver_kind(name.parse()?))
    }

    /// Selects the solver strategy.
    #[must_use]
    pub fn with_solver_kind(mut self, solver: SolverKind) -> Self {
        self.model.solver = solver;
        self
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.model.fit_intercept = fit_intercept;
        self
    }

    /// Regularization strength.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.model.lambda()
    }

    /// Shared linear state (solver, coefficients, intercept).
    #[must_use]
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Returns the coefficients (excluding intercept), `None` before fit.
    #[must_use]
    pub fn coefficients(&self) -> Option<&Vector<f64>> {
        self.model.coefficients()
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.model.intercept()
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.model.is_fitted()
    }

    /// Saves the model to a binary file using bincode.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_model(self, path)
    }

    /// Loads a model from a binary file, re-validating `lambda`.
    ///
    /// # Errors
    ///
    /// Returns an error if file reading or deserialization fails, or the
    /// stored `lambda` is not strictly positive.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let ridge: Self = load_model(path)?;
        validate_lambda(ridge.model.lambda)?;
        ridge.model.check_loaded()?;
        Ok(ridge)
    }
}

impl Estimator for Ridge {
    /// Fits by solving the regularized normal equation.
    ///
    /// # Errors
    ///
    /// Returns an error if input dimensions don't match, the data is empty,
    /// or the selected solver meets a singular system.
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self> {
        self.model.fit(x, y, "Ridge")?;
        Ok(self)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        self.model.predict(x, "Ridge")
    }
}
