//! Core compute primitives (Vector, Matrix).
//!
//! These types provide the foundation for every estimator in the crate.

mod matrix;
mod vector;

pub use matrix::{singular_tolerance, Matrix};
pub use vector::Vector;
