//! Ylearn: a small supervised-learning toolkit in pure Rust.
//!
//! Ylearn provides k-nearest-neighbors and linear estimators behind one
//! fit/predict/score contract, with pluggable least-squares solvers.
//!
//! # Quick Start
//!
//! ```
//! use ylearn::prelude::*;
//!
//! // Create training data (y = 2*x + 1)
//! let x = Matrix::from_vec(4, 1, vec![
//!     1.0,
//!     2.0,
//!     3.0,
//!     4.0,
//! ]).unwrap();
//! let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
//!
//! // Train ordinary least squares
//! let mut model = Ols::new();
//! model.fit(&x, &y).unwrap();
//!
//! // Make predictions
//! let predictions = model.predict(&x).unwrap();
//! let r2 = model.score(&x, &y).unwrap();
//! assert!(r2 > 0.99);
//! assert!((predictions[0] - 3.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`distance`]: Euclidean distance
//! - [`neighbors`]: K-nearest-neighbors classifier and regressor
//! - [`linear_model`]: Ordinary least squares and ridge regression
//! - [`linear_model::solver`]: Solver strategies and their registry
//! - [`metrics`]: Evaluation metrics
//! - [`config`]: Serde-backed estimator configuration
//!
//! # Features
//!
//! - `parallel`: answer KNN queries on the rayon thread pool

pub mod config;
pub mod distance;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod neighbors;
pub mod prelude;
pub mod primitives;
pub mod traits;

pub use error::{Result, YlearnError};
pub use primitives::{Matrix, Vector};
pub use traits::Estimator;
