//! Error types for ylearn operations.
//!
//! Every failure in the crate surfaces through [`YlearnError`]; nothing is
//! retried or recovered internally.

use thiserror::Error;

/// Main error type for ylearn operations.
///
/// # Examples
///
/// ```
/// use ylearn::error::YlearnError;
///
/// let err = YlearnError::DimensionMismatch {
///     expected: "n_features=3".to_string(),
///     actual: "2".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum YlearnError {
    /// Solver name not present in the registry.
    #[error("Unknown solver '{name}'. Available: {available:?}")]
    UnknownSolver {
        /// Name that was requested
        name: String,
        /// Names the registry knows about
        available: Vec<&'static str>,
    },

    /// Invalid hyperparameter value provided.
    #[error("Invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Classification target is not a non-negative integer label code.
    #[error("Invalid class label at index {index}: {value} is not a non-negative integer")]
    InvalidLabel {
        /// Position in the target vector
        index: usize,
        /// Offending value
        value: f64,
    },

    /// The linear system handed to a solver has no unique solution.
    #[error("Singular matrix in {solver} solver: pivot = {pivot:e}, cannot solve")]
    SingularMatrix {
        /// Solver that failed
        solver: &'static str,
        /// Magnitude of the degenerate pivot
        pivot: f64,
    },

    /// predict/score called before fit.
    #[error("{estimator} is not fitted. Call fit() first")]
    NotFitted {
        /// Estimator type name
        estimator: &'static str,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("Matrix dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// An operation received no rows to work with.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Metric cannot be computed for the given targets.
    #[error("{metric} is undefined: {reason}")]
    UndefinedMetric {
        /// Metric name
        metric: &'static str,
        /// Why it is undefined
        reason: String,
    },

    /// I/O error while persisting a model.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl YlearnError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// True for errors raised while validating construction parameters.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownSolver { .. } | Self::InvalidHyperparameter { .. }
        )
    }
}

impl From<bincode::Error> for YlearnError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for YlearnError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, YlearnError>;
