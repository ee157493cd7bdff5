//! Standard objective functions with known minima, handy for checking minimizers.
use ndarray::prelude::*;

/// Coordinate of the global minimum of [`styblinski_tang`] along every axis.
pub const STYBLINSKI_TANG_ARGMIN: f64 = -2.903534;

/// Value of [`styblinski_tang`] at its global minimum, per dimension.
pub const STYBLINSKI_TANG_MIN_PER_DIM: f64 = -39.16617;

/// The Styblinski-Tang function,
/// `f(x) = 0.5 * Σ (x_i^4 - 16 x_i^2 + 5 x_i)`.
///
/// Every axis has a local minimum near `2.746803` and the global one near
/// [`STYBLINSKI_TANG_ARGMIN`], so the function has `2^n` local minima.
pub fn styblinski_tang(x: ArrayView1<f64>) -> f64 {
    0.5 * x
        .iter()
        .map(|&xi| xi.powi(4) - 16.0 * xi.powi(2) + 5.0 * xi)
        .sum::<f64>()
}

/// The Rosenbrock function, a non-convex function with a single minimum at `(1, ..., 1)`.
///
/// `f(x) = Σ_{i=1}^{n-1} [100 (x_{i+1} - x_i^2)^2 + (1 - x_i)^2]`, for `n >= 2`.
pub fn rosenbrock(x: ArrayView1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0].powi(2)).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Squared euclidean norm.
pub fn sphere(x: ArrayView1<f64>) -> f64 {
    x.dot(&x)
}
