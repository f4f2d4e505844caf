//! Concentrated load at a joint.

use serde::{Deserialize, Serialize};

/// Forces and moment applied directly to a joint, in global components.
/// A gravity load on the usual upward-Y axes therefore has negative `fy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLoad {
    pub joint: u32,
    /// Horizontal force [kN]
    pub fx: f64,
    /// Vertical force [kN]
    pub fy: f64,
    /// Moment [kNm], positive in the model rotation sense
    pub mz: f64,
}

impl JointLoad {
    pub fn new(joint: u32, fx: f64, fy: f64, mz: f64) -> Self {
        Self { joint, fx, fy, mz }
    }

    /// Downward vertical force of magnitude `p`.
    pub fn vertical_down(joint: u32, p: f64) -> Self {
        Self::new(joint, 0.0, -p.abs(), 0.0)
    }

    /// Horizontal force, positive to the right.
    pub fn horizontal(joint: u32, p: f64) -> Self {
        Self::new(joint, p, 0.0, 0.0)
    }

    pub fn moment(joint: u32, mz: f64) -> Self {
        Self::new(joint, 0.0, 0.0, mz)
    }

    pub fn magnitude(&self) -> f64 {
        self.fx.hypot(self.fy)
    }
}
