//! Solution of the compatibility system `F·X = eh - e0`.

use log::{debug, warn};

use crate::analysis::SolverKind;
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat, Vec as DVec};

/// Condition number that earns a warning.
pub const CONDITION_WARN: f64 = 1e12;
/// Condition number beyond which no result is returned.
pub const CONDITION_FAIL: f64 = 1e15;
/// Relative residual that triggers iterative refinement.
const RESIDUAL_REFINE: f64 = 1e-8;
/// Relative residual that fails the solve outright.
const RESIDUAL_FAIL: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct CompatibilitySolution {
    pub x: DVec,
    pub condition: f64,
    pub residual: f64,
    pub warnings: Vec<String>,
}

/// Solve the compatibility system with conditioning guards, symmetric
/// equilibration and up to two refinement passes.
pub fn solve(f: &Mat, rhs: &DVec, solver: SolverKind) -> FrameResult<CompatibilitySolution> {
    let n = rhs.len();
    if n == 0 {
        return Ok(CompatibilitySolution {
            x: DVec::zeros(0),
            condition: 1.0,
            residual: 0.0,
            warnings: Vec::new(),
        });
    }

    let mut warnings = Vec::new();
    let condition = math::condition_number(f);
    if condition > CONDITION_FAIL {
        return Err(FrameError::IllConditioned { cond: condition });
    }
    if condition > CONDITION_WARN {
        let message = format!(
            "flexibility matrix is ill-conditioned (cond = {condition:.3e}); \
             consider a different redundant selection"
        );
        warn!("{message}");
        warnings.push(message);
    }

    // symmetric Jacobi equilibration keeps the scaled matrix symmetric
    // positive definite whenever the original is
    let mut d = DVec::from_element(n, 1.0);
    for i in 0..n {
        if f[(i, i)] > 0.0 {
            d[i] = 1.0 / f[(i, i)].sqrt();
        }
    }
    let scale = Mat::from_diagonal(&d);
    let fs = &scale * f * &scale;
    let bs = &scale * rhs;

    let scaled_solve = |b: &DVec| -> Option<DVec> {
        match solver {
            SolverKind::Cholesky => math::solve_cholesky(&fs, b).or_else(|| math::solve_lu(&fs, b)),
            SolverKind::Lu => math::solve_lu(&fs, b),
        }
    };

    let y = scaled_solve(&bs).ok_or_else(|| FrameError::Singular {
        context: "compatibility system".to_string(),
    })?;
    let mut x = &scale * &y;

    let denom = rhs.norm().max(1.0);
    let mut residual = (f * &x - rhs).norm() / denom;
    let mut passes = 0;
    while residual >= RESIDUAL_REFINE && passes < 2 {
        let r = f * &x - rhs;
        let correction = scaled_solve(&(&scale * &r)).ok_or_else(|| FrameError::Singular {
            context: "compatibility refinement".to_string(),
        })?;
        x -= &scale * &correction;
        residual = (f * &x - rhs).norm() / denom;
        passes += 1;
    }
    debug!("compatibility solved: cond = {condition:.3e}, residual = {residual:.3e}");

    if residual > RESIDUAL_FAIL {
        return Err(FrameError::Singular {
            context: format!("compatibility system (relative residual {residual:.3e})"),
        });
    }

    Ok(CompatibilitySolution {
        x,
        condition,
        residual,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solves_a_small_spd_system() {
        let f = Mat::from_row_slice(2, 2, &[2.0, -1.0, -1.0, 2.0]);
        let rhs = DVec::from_vec(vec![22.5, -22.5]);
        let sol = solve(&f, &rhs, SolverKind::Cholesky).unwrap();
        assert_relative_eq!(sol.x[0], 7.5, epsilon = 1e-10);
        assert_relative_eq!(sol.x[1], -7.5, epsilon = 1e-10);
        assert!(sol.residual < 1e-10);
        assert!(sol.warnings.is_empty());
    }

    #[test]
    fn warns_in_the_ill_conditioned_band() {
        let f = Mat::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1e-13]);
        let rhs = DVec::from_vec(vec![1.0, 1e-13]);
        let sol = solve(&f, &rhs, SolverKind::Cholesky).unwrap();
        assert_eq!(sol.warnings.len(), 1);
        assert_relative_eq!(sol.x[0], 1.0, epsilon = 1e-8);
    }

    #[test]
    fn refuses_a_numerically_singular_matrix() {
        let f = Mat::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0 + 1e-16]);
        let rhs = DVec::from_vec(vec![1.0, 1.0]);
        assert!(matches!(
            solve(&f, &rhs, SolverKind::Cholesky),
            Err(FrameError::IllConditioned { .. })
        ));
    }

    #[test]
    fn lu_handles_an_indefinite_matrix() {
        let f = Mat::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let rhs = DVec::from_vec(vec![3.0, 4.0]);
        let sol = solve(&f, &rhs, SolverKind::Lu).unwrap();
        assert_relative_eq!(sol.x[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(sol.x[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_system_is_trivial() {
        let sol = solve(&Mat::zeros(0, 0), &DVec::zeros(0), SolverKind::Cholesky).unwrap();
        assert_eq!(sol.x.len(), 0);
    }
}
