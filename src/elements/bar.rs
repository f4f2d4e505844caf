//! Bar element: a prismatic straight member between two joints.

use serde::{Deserialize, Serialize};

use crate::elements::Joint;

/// Geometric tolerance below which a bar is rejected as zero-length [m].
pub const LENGTH_TOLERANCE: f64 = 1e-9;

/// A straight prismatic bar. Joints, material and section are referenced
/// by id/name; the model owns the actual entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Id of the start joint (i end)
    pub i_joint: u32,
    /// Id of the end joint (j end)
    pub j_joint: u32,
    /// Material name
    pub material: String,
    /// Section name
    pub section: String,
    /// Moment release (internal hinge) at the i end
    pub hinge_i: bool,
    /// Moment release (internal hinge) at the j end
    pub hinge_j: bool,
}

impl Bar {
    pub fn new(i_joint: u32, j_joint: u32, material: &str, section: &str) -> Self {
        Self {
            i_joint,
            j_joint,
            material: material.to_string(),
            section: section.to_string(),
            hinge_i: false,
            hinge_j: false,
        }
    }

    pub fn with_hinge_i(mut self) -> Self {
        self.hinge_i = true;
        self
    }

    pub fn with_hinge_j(mut self) -> Self {
        self.hinge_j = true;
        self
    }

    /// Number of moment releases carried by this bar's ends.
    pub fn release_count(&self) -> usize {
        usize::from(self.hinge_i) + usize::from(self.hinge_j)
    }
}

/// Derived geometry of a bar: length, orientation and local frame.
///
/// The local x' axis points from the i end to the j end; y' is x' rotated
/// a quarter turn in the positive rotation sense of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub l: f64,
    pub theta: f64,
    /// Unit vector along x' in global components
    pub axis: (f64, f64),
    /// Unit vector along y' in global components
    pub normal: (f64, f64),
    /// Global coordinates of the i end
    pub origin: (f64, f64),
}

impl BarGeometry {
    pub fn from_joints(i: &Joint, j: &Joint) -> Self {
        let dx = j.x - i.x;
        let dy = j.y - i.y;
        let l = dx.hypot(dy);
        let theta = dy.atan2(dx);
        let (sin, cos) = theta.sin_cos();
        Self {
            l,
            theta,
            axis: (cos, sin),
            normal: (-sin, cos),
            origin: (i.x, i.y),
        }
    }

    /// Global coordinates of the point at local abscissa `x`.
    pub fn point_at(&self, x: f64) -> (f64, f64) {
        (
            self.origin.0 + x * self.axis.0,
            self.origin.1 + x * self.axis.1,
        )
    }

    /// Global direction of a bar load given its angle [rad] from x'.
    pub fn load_direction(&self, angle: f64) -> (f64, f64) {
        let a = self.theta + angle;
        (a.cos(), a.sin())
    }
}
