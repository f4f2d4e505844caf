//! Dense univariate polynomials for closed-form internal-force segments.
//!
//! Internal force diagrams between load events are polynomials of low
//! degree (constant axial, linear shear under uniform load, cubic moment
//! under a trapezoidal load). Representing them by coefficients keeps
//! sampling, superposition and virtual-work integration exact.

use serde::{Deserialize, Serialize};

/// Polynomial in ascending powers of x: `coeffs[k]` multiplies `x^k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poly {
    coeffs: Vec<f64>,
}

impl Poly {
    pub fn zero() -> Self {
        Self { coeffs: vec![] }
    }

    pub fn constant(c: f64) -> Self {
        if c == 0.0 {
            Self::zero()
        } else {
            Self { coeffs: vec![c] }
        }
    }

    /// `c0 + c1·x`
    pub fn linear(c0: f64, c1: f64) -> Self {
        Self { coeffs: vec![c0, c1] }.trimmed()
    }

    pub fn from_coeffs(coeffs: Vec<f64>) -> Self {
        Self { coeffs }.trimmed()
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    fn trimmed(mut self) -> Self {
        while self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
        self
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut coeffs = vec![0.0; n];
        for (k, c) in coeffs.iter_mut().enumerate() {
            *c = self.coeffs.get(k).copied().unwrap_or(0.0)
                + other.coeffs.get(k).copied().unwrap_or(0.0);
        }
        Poly { coeffs }.trimmed()
    }

    pub fn scale(&self, s: f64) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|c| c * s).collect(),
        }
        .trimmed()
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Poly { coeffs }.trimmed()
    }

    /// Antiderivative with zero constant term.
    pub fn antiderivative(&self) -> Poly {
        let mut coeffs = vec![0.0; self.coeffs.len() + 1];
        for (k, &c) in self.coeffs.iter().enumerate() {
            coeffs[k + 1] = c / (k as f64 + 1.0);
        }
        Poly { coeffs }.trimmed()
    }

    /// Definite integral over `[a, b]`.
    pub fn integrate(&self, a: f64, b: f64) -> f64 {
        let f = self.antiderivative();
        f.eval(b) - f.eval(a)
    }
}

/// Merge two ascending breakpoint lists, deduplicating within `tol`.
pub fn merge_breaks(a: &[f64], b: &[f64], tol: f64) -> Vec<f64> {
    let mut all: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    all.sort_by(|p, q| p.partial_cmp(q).expect("finite breakpoints"));
    let mut merged: Vec<f64> = Vec::with_capacity(all.len());
    for x in all {
        match merged.last() {
            Some(&last) if (x - last).abs() <= tol => {}
            _ => merged.push(x),
        }
    }
    merged
}
