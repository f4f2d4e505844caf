//! Prescribed support movement.

use serde::{Deserialize, Serialize};

/// Imposed displacement at a supported joint: settlement, sway or
/// prescribed rotation. Components follow the global axes, so a downward
/// settlement has negative `dy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImposedDisplacement {
    pub joint: u32,
    /// Horizontal movement [m]
    pub dx: f64,
    /// Vertical movement [m]
    pub dy: f64,
    /// Rotation [rad]
    pub dtheta: f64,
}

impl ImposedDisplacement {
    pub fn new(joint: u32, dx: f64, dy: f64, dtheta: f64) -> Self {
        Self {
            joint,
            dx,
            dy,
            dtheta,
        }
    }

    /// Downward settlement of `delta` meters.
    pub fn settlement(joint: u32, delta: f64) -> Self {
        Self::new(joint, 0.0, -delta.abs(), 0.0)
    }

    pub fn is_null(&self) -> bool {
        self.dx.abs() < 1e-15 && self.dy.abs() < 1e-15 && self.dtheta.abs() < 1e-15
    }
}
