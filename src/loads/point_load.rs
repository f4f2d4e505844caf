//! Concentrated load on a bar.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::elements::BarGeometry;

/// Point force of magnitude `p` applied at local abscissa `a` from the
/// i end, with direction `angle` [rad] measured from the bar's local x'
/// axis in the model's positive rotation sense. `-pi/2` is the gravity
/// direction on a horizontal bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarPointLoad {
    pub bar: u32,
    /// Magnitude [kN]
    pub p: f64,
    /// Distance from the i end [m]
    pub a: f64,
    /// Direction from local x' [rad]
    pub angle: f64,
}

impl BarPointLoad {
    pub fn new(bar: u32, p: f64, a: f64, angle: f64) -> Self {
        Self { bar, p, a, angle }
    }

    /// Transverse load toward the local -y' side (gravity on a horizontal
    /// bar).
    pub fn transverse_down(bar: u32, p: f64, a: f64) -> Self {
        Self::new(bar, p.abs(), a, -FRAC_PI_2)
    }

    /// Global force components for a bar with the given geometry.
    pub fn global_components(&self, geometry: &BarGeometry) -> (f64, f64) {
        let (dx, dy) = geometry.load_direction(self.angle);
        (self.p * dx, self.p * dy)
    }
}
