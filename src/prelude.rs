//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use ylearn::prelude::*;
//! ```

pub use crate::error::{Result, YlearnError};
pub use crate::linear_model::solver::SolverKind;
pub use crate::linear_model::{Ols, Ridge};
pub use crate::metrics::{accuracy, mae, mse, r_squared};
pub use crate::neighbors::{KNeighborsClassifier, KNeighborsRegressor};
pub use crate::primitives::{Matrix, Vector};
pub use crate::traits::Estimator;
