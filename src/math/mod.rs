//! Mathematical utilities for the force-method pipeline.

pub mod integrate;
pub mod poly;

use nalgebra::{DMatrix, DVector};

pub use integrate::{simpson, simpson_adaptive};
pub use poly::{merge_breaks, Poly};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// Moment of a force about a point in the TERNA convention.
///
/// `M = -Fy*(xp - xf) + Fx*(yp - yf)` where `(xf, yf)` is the point of
/// application and `(xp, yp)` the pivot.
pub fn moment_about(fx: f64, fy: f64, xf: f64, yf: f64, xp: f64, yp: f64) -> f64 {
    -fy * (xp - xf) + fx * (yp - yf)
}

/// 2-norm condition number via SVD. Returns `f64::INFINITY` for singular
/// or empty matrices.
pub fn condition_number(a: &Mat) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let sv = a.clone().singular_values();
    let max = sv.max();
    let min = sv.min();
    if min <= 0.0 || !min.is_finite() {
        f64::INFINITY
    } else {
        max / min
    }
}

/// Numerical rank via SVD with a tolerance relative to the largest
/// singular value.
pub fn numerical_rank(a: &Mat) -> usize {
    if a.is_empty() {
        return 0;
    }
    let sv = a.clone().singular_values();
    let max = sv.max();
    if max <= 0.0 {
        return 0;
    }
    let tol = max * 1e-10 * (a.nrows().max(a.ncols()) as f64);
    sv.iter().filter(|&&s| s > tol).count()
}

/// Solve with LU and partial pivoting.
pub fn solve_lu(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

/// Solve with Cholesky; `None` when the matrix is not positive definite.
pub fn solve_cholesky(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().cholesky().map(|chol| chol.solve(b))
}
