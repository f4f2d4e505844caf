//! Result types for a force-method analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::Redundant;
use crate::field::ForceField;
use crate::math::Poly;

/// Reaction components at a supported joint, in global axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Horizontal reaction [kN]
    pub fx: f64,
    /// Vertical reaction [kN]
    pub fy: f64,
    /// Reaction moment [kNm]
    pub mz: f64,
}

impl Reaction {
    pub fn new(fx: f64, fy: f64, mz: f64) -> Self {
        Self { fx, fy, mz }
    }

    pub fn force_magnitude(&self) -> f64 {
        self.fx.hypot(self.fy)
    }
}

/// Displacement components at a joint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JointDisplacement {
    /// Horizontal displacement [m]
    pub ux: f64,
    /// Vertical displacement [m]
    pub uy: f64,
    /// Rotation [rad]
    pub rz: f64,
}

/// Numerical health report of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// 2-norm condition number of the flexibility matrix (1 when gh = 0)
    pub condition_number: f64,
    /// Relative residual of the compatibility solve
    pub residual_norm: f64,
    /// Global equilibrium residuals (sum Fx, sum Fy, sum Mz about origin)
    pub equilibrium_residuals: (f64, f64, f64),
    /// Non-fatal findings, in the order they were produced
    pub warnings: Vec<String>,
}

/// Elastic deflection curve of one bar: rotation and transverse deflection
/// as piecewise polynomials in the local abscissa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeflectionCurve {
    pub bar: u32,
    pub length: f64,
    /// Segment start abscissas plus the bar end
    pub breaks: Vec<f64>,
    /// Rotation theta(x) per segment [rad]
    pub theta: Vec<Poly>,
    /// Transverse deflection v(x) per segment [m], positive toward +y'
    pub v: Vec<Poly>,
}

impl DeflectionCurve {
    fn segment_index(&self, x: f64) -> usize {
        let mut idx = 0;
        for (k, &start) in self.breaks.iter().take(self.theta.len()).enumerate() {
            if x >= start - 1e-9 {
                idx = k;
            }
        }
        idx
    }

    pub fn rotation(&self, x: f64) -> f64 {
        self.theta[self.segment_index(x)].eval(x)
    }

    pub fn deflection(&self, x: f64) -> f64 {
        self.v[self.segment_index(x)].eval(x)
    }
}

/// Complete output of one analysis call. The model is left untouched;
/// everything a consumer needs to sample lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Degree of static indeterminacy
    pub gh: i32,
    /// Redundants actually used, in solve order
    pub redundants: Vec<Redundant>,
    /// Solved redundant values, one-to-one with `redundants`
    pub x: Vec<f64>,
    /// Final reactions per supported joint
    pub reactions: BTreeMap<u32, Reaction>,
    /// Final internal force fields per bar
    pub bar_fields: BTreeMap<u32, ForceField>,
    /// Displacements per joint
    pub joint_displacements: BTreeMap<u32, JointDisplacement>,
    /// Elastic curves per bar
    pub deflections: BTreeMap<u32, DeflectionCurve>,
    /// Numerical diagnostics
    pub diagnostics: Diagnostics,
}

impl AnalysisResult {
    pub fn reaction(&self, joint: u32) -> Reaction {
        self.reactions.get(&joint).copied().unwrap_or_default()
    }

    pub fn displacement(&self, joint: u32) -> JointDisplacement {
        self.joint_displacements
            .get(&joint)
            .copied()
            .unwrap_or_default()
    }

    /// Bending moment on a bar at local abscissa `x` [kNm].
    pub fn m(&self, bar: u32, x: f64) -> f64 {
        self.bar_fields.get(&bar).map_or(0.0, |f| f.m(x))
    }

    /// Shear force on a bar at local abscissa `x` [kN].
    pub fn v(&self, bar: u32, x: f64) -> f64 {
        self.bar_fields.get(&bar).map_or(0.0, |f| f.v(x))
    }

    /// Axial force on a bar at local abscissa `x` [kN].
    pub fn n(&self, bar: u32, x: f64) -> f64 {
        self.bar_fields.get(&bar).map_or(0.0, |f| f.n(x))
    }

    pub fn deflection(&self, bar: u32) -> Option<&DeflectionCurve> {
        self.deflections.get(&bar)
    }
}
