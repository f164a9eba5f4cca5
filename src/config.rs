//! Declarative estimator configuration.
//!
//! Hyperparameters can be read from JSON (or any serde format) instead of
//! being passed to the builders directly. Building from a record goes
//! through the same constructors, so an unknown solver name, `k = 0` or a
//! non-positive ridge `lambda` are rejected exactly as they would be in code.
//!
//! ```
//! use ylearn::config::{EstimatorParams, Model};
//!
//! let params = EstimatorParams::from_json(r#"{"model": "ridge", "lambda": 2.5}"#).unwrap();
//! let model = params.build().unwrap();
//! assert!(matches!(model, Model::Ridge(_)));
//! ```

use crate::error::{Result, YlearnError};
use crate::linear_model::{Ols, Ridge};
use crate::neighbors::{KNeighborsClassifier, KNeighborsRegressor};
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

fn default_k() -> usize {
    5
}

fn default_ols_solver() -> String {
    "qr".to_string()
}

fn default_ridge_solver() -> String {
    "qr_ridge".to_string()
}

fn default_true() -> bool {
    true
}

/// Hyperparameters shared by both KNN estimators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnnParams {
    #[serde(default = "default_k")]
    pub k: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { k: default_k() }
    }
}

impl KnnParams {
    /// # Errors
    ///
    /// Fails if `k == 0`.
    pub fn classifier(&self) -> Result<KNeighborsClassifier> {
        KNeighborsClassifier::new(self.k)
    }

    /// # Errors
    ///
    /// Fails if `k == 0`.
    pub fn regressor(&self) -> Result<KNeighborsRegressor> {
        KNeighborsRegressor::new(self.k)
    }
}

/// Hyperparameters for [`Ols`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OlsParams {
    #[serde(default = "default_ols_solver")]
    pub solver: String,
    #[serde(default = "default_true")]
    pub fit_intercept: bool,
}

impl Default for OlsParams {
    fn default() -> Self {
        Self {
            solver: default_ols_solver(),
            fit_intercept: true,
        }
    }
}

impl OlsParams {
    /// # Errors
    ///
    /// Fails on an unregistered solver name.
    pub fn build(&self) -> Result<Ols> {
        Ok(Ols::new()
            .with_solver(&self.solver)?
            .with_intercept(self.fit_intercept))
    }
}

/// Hyperparameters for [`Ridge`]. `lambda` has no default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeParams {
    pub lambda: f64,
    #[serde(default = "default_ridge_solver")]
    pub solver: String,
    #[serde(default = "default_true")]
    pub fit_intercept: bool,
}

impl RidgeParams {
    #[must_use]
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda,
            solver: default_ridge_solver(),
            fit_intercept: true,
        }
    }

    /// # Errors
    ///
    /// Fails unless `lambda` is finite and positive, or on an unregistered
    /// solver name.
    pub fn build(&self) -> Result<Ridge> {
        Ok(Ridge::new(self.lambda)?
            .with_solver(&self.solver)?
            .with_intercept(self.fit_intercept))
    }
}

/// Any estimator configuration, tagged by `model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum EstimatorParams {
    KnnClassifier(KnnParams),
    KnnRegressor(KnnParams),
    Ols(OlsParams),
    Ridge(RidgeParams),
}

impl EstimatorParams {
    /// Parses a JSON configuration record.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::Serialization`] for malformed JSON, unknown
    /// `model` tags or missing required fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the unfitted estimator described by this record.
    ///
    /// # Errors
    ///
    /// Returns the same configuration errors as the estimator constructors.
    pub fn build(&self) -> Result<Model> {
        let model = match self {
            Self::KnnClassifier(p) => Model::KnnClassifier(p.classifier()?),
            Self::KnnRegressor(p) => Model::KnnRegressor(p.regressor()?),
            Self::Ols(p) => Model::Ols(p.build()?),
            Self::Ridge(p) => Model::Ridge(p.build()?),
        };
        log::debug!("built {} from configuration", model.name());
        Ok(model)
    }
}

/// An estimator built from [`EstimatorParams`].
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    KnnClassifier(KNeighborsClassifier),
    KnnRegressor(KNeighborsRegressor),
    Ols(Ols),
    Ridge(Ridge),
}

impl Model {
    /// Estimator type name, as used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::KnnClassifier(_) => "KNeighborsClassifier",
            Self::KnnRegressor(_) => "KNeighborsRegressor",
            Self::Ols(_) => "Ols",
            Self::Ridge(_) => "Ridge",
        }
    }

    #[must_use]
    pub fn is_fitted(&self) -> bool {
        match self {
            Self::KnnClassifier(m) => m.is_fitted(),
            Self::KnnRegressor(m) => m.is_fitted(),
            Self::Ols(m) => m.is_fitted(),
            Self::Ridge(m) => m.is_fitted(),
        }
    }
}

impl Estimator for Model {
    fn fit(&mut self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<&mut Self> {
        match self {
            Self::KnnClassifier(m) => {
                m.fit(x, y)?;
            }
            Self::KnnRegressor(m) => {
                m.fit(x, y)?;
            }
            Self::Ols(m) => {
                m.fit(x, y)?;
            }
            Self::Ridge(m) => {
                m.fit(x, y)?;
            }
        }
        Ok(self)
    }

    fn predict(&self, x: &Matrix<f64>) -> Result<Vector<f64>> {
        match self {
            Self::KnnClassifier(m) => m.predict(x),
            Self::KnnRegressor(m) => m.predict(x),
            Self::Ols(m) => m.predict(x),
            Self::Ridge(m) => m.predict(x),
        }
    }

    /// Delegates so the classifier keeps its accuracy score.
    fn score(&self, x: &Matrix<f64>, y: &Vector<f64>) -> Result<f64> {
        match self {
            Self::KnnClassifier(m) => m.score(x, y),
            Self::KnnRegressor(m) => m.score(x, y),
            Self::Ols(m) => m.score(x, y),
            Self::Ridge(m) => m.score(x, y),
        }
    }
}

impl TryFrom<&EstimatorParams> for Model {
    type Error = YlearnError;

    fn try_from(params: &EstimatorParams) -> Result<Self> {
        params.build()
    }
}
