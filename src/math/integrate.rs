//! Composite Simpson integration for virtual-work products.
//!
//! Simpson's rule is exact for polynomials up to cubic degree. Products of
//! force diagrams can reach quartic (trapezoidal load moment against a
//! quadratic unit diagram), so the sample count doubles adaptively until
//! two successive estimates agree.

/// Relative agreement required between successive adaptive estimates.
pub const ADAPTIVE_RTOL: f64 = 1e-10;

/// Hard cap on samples per segment; beyond this the integral is declared
/// non-convergent.
const MAX_POINTS: usize = 1 << 14;

/// Composite Simpson over `[a, b]` with `points` samples (odd, >= 3).
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, points: usize) -> f64 {
    debug_assert!(points >= 3 && points % 2 == 1);
    if b <= a {
        return 0.0;
    }
    let n = points - 1;
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for k in 1..n {
        let w = if k % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * f(a + k as f64 * h);
    }
    sum * h / 3.0
}

/// Simpson with adaptive doubling.
///
/// `exact` marks integrands of polynomial degree <= 3, for which a single
/// pass is already exact. Returns `None` if the estimates never settle
/// within [`ADAPTIVE_RTOL`].
pub fn simpson_adaptive<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    base_points: usize,
    exact: bool,
) -> Option<f64> {
    let mut points = base_points.max(5) | 1;
    let mut estimate = simpson(&f, a, b, points);
    if exact {
        return Some(estimate);
    }
    while points < MAX_POINTS {
        points = points * 2 - 1;
        let refined = simpson(&f, a, b, points);
        let scale = estimate.abs().max(refined.abs()).max(1.0);
        if (refined - estimate).abs() <= ADAPTIVE_RTOL * scale {
            return Some(refined);
        }
        estimate = refined;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn exact_for_cubics() {
        // integral of x^3 over [0, 2] = 4
        let v = simpson(|x| x * x * x, 0.0, 2.0, 5);
        assert_relative_eq!(v, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn adaptive_converges_on_quartic() {
        // integral of x^4 over [0, 1] = 0.2
        let v = simpson_adaptive(|x| x.powi(4), 0.0, 1.0, 5, false).unwrap();
        assert_relative_eq!(v, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_interval_is_zero() {
        assert_eq!(simpson(|x| x, 3.0, 3.0, 5), 0.0);
    }
}
