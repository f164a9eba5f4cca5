//! Distance functions between feature vectors.

/// Euclidean distance: `sqrt(sum((a_i - b_i)^2))`.
///
/// Both slices must have the same length; the caller guarantees alignment.
///
/// # Examples
///
/// ```
/// use ylearn::distance::euclidean;
///
/// assert!((euclidean(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Points must have same dimensionality");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
