//! Piecewise closed-form internal force field of a bar.
//!
//! Between consecutive load events the axial force, shear and bending
//! moment are exact polynomials in the local abscissa. The field stores
//! those segments so sampling, superposition and virtual-work integration
//! never fall back to interpolation.

use serde::{Deserialize, Serialize};

use crate::math::{merge_breaks, Poly};

const BREAK_TOLERANCE: f64 = 1e-9;

/// One segment of the field; the polynomials are in the bar's local
/// abscissa (not segment-relative), so evaluation needs no shifting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentField {
    pub x0: f64,
    pub x1: f64,
    pub n: Poly,
    pub v: Poly,
    pub m: Poly,
}

/// Internal force diagrams N(x), V(x), M(x) over a bar of length `length`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceField {
    pub bar: u32,
    pub length: f64,
    pub segments: Vec<SegmentField>,
}

impl ForceField {
    pub fn zero(bar: u32, length: f64) -> Self {
        Self {
            bar,
            length,
            segments: vec![SegmentField {
                x0: 0.0,
                x1: length,
                n: Poly::zero(),
                v: Poly::zero(),
                m: Poly::zero(),
            }],
        }
    }

    /// Sorted breakpoints, including both bar ends.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut breaks: Vec<f64> = self.segments.iter().map(|s| s.x0).collect();
        if let Some(last) = self.segments.last() {
            breaks.push(last.x1);
        }
        breaks
    }

    /// Segment containing `x`; points exactly on an interior breakpoint
    /// resolve to the segment starting there, so sampling at an event
    /// yields the right-hand value.
    pub fn segment_at(&self, x: f64) -> &SegmentField {
        let mut chosen = &self.segments[0];
        for seg in &self.segments {
            if x >= seg.x0 - BREAK_TOLERANCE {
                chosen = seg;
            } else {
                break;
            }
        }
        chosen
    }

    /// Segment whose closed right end is `x`, for left-limit sampling.
    fn segment_before(&self, x: f64) -> &SegmentField {
        let mut chosen = &self.segments[0];
        for seg in &self.segments {
            if x > seg.x0 + BREAK_TOLERANCE {
                chosen = seg;
            } else {
                break;
            }
        }
        chosen
    }

    /// Axial force at `x` [kN], tension positive.
    pub fn n(&self, x: f64) -> f64 {
        self.segment_at(x).n.eval(x)
    }

    /// Shear force at `x` [kN].
    pub fn v(&self, x: f64) -> f64 {
        self.segment_at(x).v.eval(x)
    }

    /// Bending moment at `x` [kNm].
    pub fn m(&self, x: f64) -> f64 {
        self.segment_at(x).m.eval(x)
    }

    /// Left-limit values at `x`, for jump inspection at events.
    pub fn values_before(&self, x: f64) -> (f64, f64, f64) {
        let seg = self.segment_before(x);
        (seg.n.eval(x), seg.v.eval(x), seg.m.eval(x))
    }

    /// Right-limit values at `x`.
    pub fn values_after(&self, x: f64) -> (f64, f64, f64) {
        let seg = self.segment_at(x);
        (seg.n.eval(x), seg.v.eval(x), seg.m.eval(x))
    }

    /// Linear combination `self + sum(factor_k * field_k)`; segments are
    /// rebuilt over the merged breakpoints, so the result stays exact.
    pub fn superpose(&self, terms: &[(f64, &ForceField)]) -> ForceField {
        let mut breaks = self.breakpoints();
        for (_, field) in terms {
            breaks = merge_breaks(&breaks, &field.breakpoints(), BREAK_TOLERANCE);
        }
        let mut segments = Vec::with_capacity(breaks.len().saturating_sub(1));
        for pair in breaks.windows(2) {
            let (x0, x1) = (pair[0], pair[1]);
            let mid = 0.5 * (x0 + x1);
            let base = self.segment_at(mid);
            let mut n = base.n.clone();
            let mut v = base.v.clone();
            let mut m = base.m.clone();
            for (factor, field) in terms {
                let seg = field.segment_at(mid);
                n = n.add(&seg.n.scale(*factor));
                v = v.add(&seg.v.scale(*factor));
                m = m.add(&seg.m.scale(*factor));
            }
            segments.push(SegmentField { x0, x1, n, v, m });
        }
        ForceField {
            bar: self.bar,
            length: self.length,
            segments,
        }
    }

    /// Largest absolute bending moment over the bar, sampled densely.
    pub fn max_abs_moment(&self) -> f64 {
        let samples = 101;
        (0..=samples)
            .map(|k| self.m(self.length * k as f64 / samples as f64).abs())
            .fold(0.0, f64::max)
    }
}
