//! Matrix type for 2D numeric data.

use super::Vector;
use crate::error::{Result, YlearnError};
use serde::{Deserialize, Serialize};

/// A 2D matrix of floating-point values (row-major storage).
///
/// # Examples
///
/// ```
/// use ylearn::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(YlearnError::DimensionMismatch {
                expected: format!("{rows}x{cols} = {} elements", rows * cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix from equal-length rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are ragged.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(YlearnError::DimensionMismatch {
                    expected: format!("row {i} with {cols} columns"),
                    actual: format!("{} columns", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrows a row without copying.
    ///
    /// # Panics
    ///
    /// Panics if `row_idx` is out of bounds.
    #[must_use]
    pub fn row_slice(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Iterates over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row_slice(i))
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<f64> {
    /// Creates a matrix of zeros.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Transposes the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Matrix-matrix multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match.
    pub fn matmul(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(YlearnError::DimensionMismatch {
                expected: format!("left operand with {} columns", other.rows),
                actual: format!("{}x{}", self.rows, self.cols),
            });
        }

        let mut result = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                for j in 0..other.cols {
                    result[i * other.cols + j] += a * other.get(k, j);
                }
            }
        }

        Ok(Self {
            data: result,
            rows: self.rows,
            cols: other.cols,
        })
    }

    /// Matrix-vector multiplication.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match.
    pub fn matvec(&self, vec: &Vector<f64>) -> Result<Vector<f64>> {
        if self.cols != vec.len() {
            return Err(YlearnError::dimension_mismatch(
                "vector length",
                self.cols,
                vec.len(),
            ));
        }

        Ok(self
            .rows()
            .map(|row| row.iter().zip(vec.iter()).map(|(a, b)| a * b).sum::<f64>())
            .collect())
    }

    /// Adds `value` to every diagonal element of a square matrix.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the matrix is not square.
    pub fn add_diagonal(&mut self, value: f64) {
        debug_assert_eq!(self.rows, self.cols, "Matrix must be square");
        for i in 0..self.rows.min(self.cols) {
            self.data[i * self.cols + i] += value;
        }
    }

    /// Largest absolute entry, 0.0 for an empty matrix.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// Thin QR factorization via Householder reflections.
    ///
    /// For an `n x m` matrix with `k = min(n, m)`, returns `Q` (`n x k`, orthonormal
    /// columns) and `R` (`k x m`, upper trapezoidal) such that `self = Q R`.
    #[must_use]
    pub fn qr(&self) -> (Self, Self) {
        let (n, m) = self.shape();
        let k = n.min(m);
        let mut a = self.data.clone();
        let mut reflectors: Vec<(Vec<f64>, f64)> = Vec::with_capacity(k);

        for j in 0..k {
            let norm = (j..n).map(|i| a[i * m + j].powi(2)).sum::<f64>().sqrt();
            let mut v = vec![0.0; n - j];
            if norm == 0.0 {
                reflectors.push((v, 0.0));
                continue;
            }

            let diag = a[j * m + j];
            let alpha = if diag >= 0.0 { -norm } else { norm };
            v[0] = diag - alpha;
            for i in (j + 1)..n {
                v[i - j] = a[i * m + j];
            }
            let v_norm_sq: f64 = v.iter().map(|x| x * x).sum();

            for c in (j + 1)..m {
                let s: f64 = (j..n).map(|i| v[i - j] * a[i * m + c]).sum();
                let f = 2.0 * s / v_norm_sq;
                for i in j..n {
                    a[i * m + c] -= f * v[i - j];
                }
            }
            a[j * m + j] = alpha;
            for i in (j + 1)..n {
                a[i * m + j] = 0.0;
            }

            reflectors.push((v, v_norm_sq));
        }

        let mut r = Self::zeros(k, m);
        for i in 0..k {
            for c in i..m {
                r.set(i, c, a[i * m + c]);
            }
        }

        // Q = H_0 H_1 ... H_{k-1} applied to the first k columns of I.
        let mut q = Self::zeros(n, k);
        for i in 0..k {
            q.set(i, i, 1.0);
        }
        for (j, (v, v_norm_sq)) in reflectors.iter().enumerate().rev() {
            if *v_norm_sq == 0.0 {
                continue;
            }
            for c in 0..k {
                let s: f64 = (j..n).map(|i| v[i - j] * q.get(i, c)).sum();
                let f = 2.0 * s / v_norm_sq;
                for i in j..n {
                    let updated = q.get(i, c) - f * v[i - j];
                    q.set(i, c, updated);
                }
            }
        }

        (q, r)
    }

    /// Solves the square system `A x = b` by Gaussian elimination with
    /// partial pivoting.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::SingularMatrix`] when a pivot falls below
    /// `n * eps * max|A|`, and a dimension error for non-square input.
    pub fn lu_solve(&self, b: &Vector<f64>) -> Result<Vector<f64>> {
        if self.rows != self.cols {
            return Err(YlearnError::DimensionMismatch {
                expected: "square matrix".to_string(),
                actual: format!("{}x{}", self.rows, self.cols),
            });
        }
        if self.rows != b.len() {
            return Err(YlearnError::dimension_mismatch(
                "right-hand side length",
                self.rows,
                b.len(),
            ));
        }

        let n = self.rows;
        let tol = singular_tolerance(n, self.max_abs());
        let mut a = self.data.clone();
        let mut rhs = b.as_slice().to_vec();

        for col in 0..n {
            let pivot_row = (col..n)
                .max_by(|&i, &j| a[i * n + col].abs().total_cmp(&a[j * n + col].abs()))
                .unwrap_or(col);
            let pivot = a[pivot_row * n + col];
            if pivot.abs() <= tol {
                return Err(YlearnError::SingularMatrix {
                    solver: "lu",
                    pivot: pivot.abs(),
                });
            }

            if pivot_row != col {
                for c in 0..n {
                    a.swap(col * n + c, pivot_row * n + c);
                }
                rhs.swap(col, pivot_row);
            }

            for row in (col + 1)..n {
                let factor = a[row * n + col] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for c in col..n {
                    a[row * n + c] -= factor * a[col * n + c];
                }
                rhs[row] -= factor * rhs[col];
            }
        }

        let upper = Self {
            data: a,
            rows: n,
            cols: n,
        };
        upper.back_substitute(&Vector::from_vec(rhs), tol)
    }

    /// Solves `R x = b` for upper-triangular square `R`.
    ///
    /// # Errors
    ///
    /// Returns [`YlearnError::SingularMatrix`] if any diagonal entry has
    /// magnitude at most `tol`.
    pub fn back_substitute(&self, b: &Vector<f64>, tol: f64) -> Result<Vector<f64>> {
        if self.rows != self.cols {
            return Err(YlearnError::DimensionMismatch {
                expected: "square upper-triangular matrix".to_string(),
                actual: format!("{}x{}", self.rows, self.cols),
            });
        }
        if self.rows != b.len() {
            return Err(YlearnError::dimension_mismatch(
                "right-hand side length",
                self.rows,
                b.len(),
            ));
        }

        let n = self.rows;
        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let diag = self.get(i, i);
            if diag.abs() <= tol {
                return Err(YlearnError::SingularMatrix {
                    solver: "back-substitution",
                    pivot: diag.abs(),
                });
            }
            let sum: f64 = ((i + 1)..n).map(|j| self.get(i, j) * x[j]).sum();
            x[i] = (b[i] - sum) / diag;
        }

        Ok(Vector::from_vec(x))
    }
}

/// Relative pivot threshold below which a system is treated as singular.
#[must_use]
pub fn singular_tolerance(dim: usize, scale: f64) -> f64 {
    dim.max(1) as f64 * f64::EPSILON * scale
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
