//! Linear solver strategies and the solver registry.
//!
//! Every strategy computes the coefficient vector `w` of the regularized
//! normal equation
//!
//! ```text
//! (X^T X + λI) w = X^T y
//! ```
//!
//! with a different factorization. Strategies are stateless singletons; the
//! registry maps a name (`"normal"`, `"qr"`, `"qr_ridge"`) to one of them and
//! never changes after initialization.

use crate::error::{Result, YlearnError};
use crate::primitives::{singular_tolerance, Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strategy solving `(X^T X + λI) w = X^T y` for `w`.
pub trait LinearSolver: fmt::Debug + Send + Sync {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// Solves for the coefficient vector (length `x.n_cols()`).
    ///
    /// # Errors
    ///
    /// Fails if `x` and `y` are misaligned or empty, if `lambda` is negative
    /// or not finite, or if the system to solve is singular.
    fn solve(&self, x: &Matrix<f64>, y: &Vector<f64>, lambda: f64) -> Result<Vector<f64>>;
}

fn validate_system(x: &Matrix<f64>, y: &Vector<f64>, lambda: f64) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(YlearnError::dimension_mismatch(
            "n_samples",
            x.n_rows(),
            y.len(),
        ));
    }
    if x.n_rows() == 0 || x.n_cols() == 0 {
        return Err(YlearnError::empty_input("design matrix"));
    }
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(YlearnError::InvalidHyperparameter {
            param: "lambda".to_string(),
            value: lambda.to_string(),
            constraint: "finite and >= 0".to_string(),
        });
    }
    Ok(())
}

// Reports a factorization failure under the strategy that hit it.
fn attribute(solver: &'static str) -> impl Fn(YlearnError) -> YlearnError {
    move |err| match err {
        YlearnError::SingularMatrix { pivot, .. } => YlearnError::SingularMatrix { solver, pivot },
        other => other,
    }
}

/// Solves the normal equation directly by forming `X^T X + λI`.
///
/// Cheapest when `n_features << n_samples`, but squares the condition
/// number of `X`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalEquationSolver;

impl LinearSolver for NormalEquationSolver {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn solve(&self, x: &Matrix<f64>, y: &Vector<f64>, lambda: f64) -> Result<Vector<f64>> {
        validate_system(x, y, lambda)?;
        let (n_samples, n_params) = x.shape();
        if lambda == 0.0 && n_samples < n_params {
            return Err(YlearnError::SingularMatrix {
                solver: self.name(),
                pivot: 0.0,
            });
        }

        let xt = x.transpose();
        let mut xtx = xt.matmul(x)?;
        xtx.add_diagonal(lambda);
        let xty = xt.matvec(y)?;

        xtx.lu_solve(&xty).map_err(attribute(self.name()))
    }
}

/// Unregularized least squares via `X = QR`, solving `R w = Q^T y`.
///
/// `lambda` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrSolver;

impl LinearSolver for QrSolver {
    fn name(&self) -> &'static str {
        "qr"
    }

    fn solve(&self, x: &Matrix<f64>, y: &Vector<f64>, lambda: f64) -> Result<Vector<f64>> {
        validate_system(x, y, lambda)?;
        if lambda != 0.0 {
            log::debug!("qr solver ignores lambda = {lambda}");
        }

        let (n_samples, n_params) = x.shape();
        if n_samples < n_params {
            return Err(YlearnError::SingularMatrix {
                solver: self.name(),
                pivot: 0.0,
            });
        }

        let (q, r) = x.qr();
        let qty = q.transpose().matvec(y)?;
        let tol = singular_tolerance(n_samples, r.max_abs());

        r.back_substitute(&qty, tol).map_err(attribute(self.name()))
    }
}

/// Ridge least squares via `X = QR`, solving `(R^T R + λI) w = R^T Q^T y`.
///
/// Avoids forming `X^T X`. Also handles `n_samples < n_features` when
/// `lambda > 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrRidgeSolver;

impl LinearSolver for QrRidgeSolver {
    fn name(&self) -> &'static str {
        "qr_ridge"
    }

    fn solve(&self, x: &Matrix<f64>, y: &Vector<f64>, lambda: f64) -> Result<Vector<f64>> {
        validate_system(x, y, lambda)?;

        let (q, r) = x.qr();
        let rt = r.transpose();

        let b = rt.matvec(&q.transpose().matvec(y)?)?;
        let mut a = rt.matmul(&r)?;
        a.add_diagonal(lambda);

        a.lu_solve(&b).map_err(attribute(self.name()))
    }
}

static NORMAL: NormalEquationSolver = NormalEquationSolver;
static QR: QrSolver = QrSolver;
static QR_RIDGE: QrRidgeSolver = QrRidgeSolver;

/// Names accepted by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    /// [`NormalEquationSolver`]
    Normal,
    /// [`QrSolver`]
    Qr,
    /// [`QrRidgeSolver`]
    QrRidge,
}

impl SolverKind {
    /// Every registered solver, in registry order.
    pub const ALL: [SolverKind; 3] = [SolverKind::Normal, SolverKind::Qr, SolverKind::QrRidge];

    /// Registry name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::Normal => "normal",
            SolverKind::Qr => "qr",
            SolverKind::QrRidge => "qr_ridge",
        }
    }

    /// Singleton strategy registered under this name.
    #[must_use]
    pub fn solver(self) -> &'static dyn LinearSolver {
        match self {
            SolverKind::Normal => &NORMAL,
            SolverKind::Qr => &QR,
            SolverKind::QrRidge => &QR_RIDGE,
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = YlearnError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "normal" => Ok(SolverKind::Normal),
            "qr" => Ok(SolverKind::Qr),
            "qr_ridge" => Ok(SolverKind::QrRidge),
            _ => Err(YlearnError::UnknownSolver {
                name: name.to_string(),
                available: available(),
            }),
        }
    }
}

/// Registered solver names.
#[must_use]
pub fn available() -> Vec<&'static str> {
    SolverKind::ALL.iter().map(|kind| kind.name()).collect()
}

/// Looks up a solver strategy by name.
///
/// # Examples
///
/// ```
/// use ylearn::linear_model::solver;
///
/// assert_eq!(solver::get("qr").unwrap().name(), "qr");
/// assert!(solver::get("bogus").is_err());
/// ```
///
/// # Errors
///
/// Returns [`YlearnError::UnknownSolver`] listing the valid names.
pub fn get(name: &str) -> Result<&'static dyn LinearSolver> {
    name.parse::<SolverKind>().map(SolverKind::solver)
}
