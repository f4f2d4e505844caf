//! Thermal action on a bar.

use serde::{Deserialize, Serialize};

/// Temperature change on a bar: a uniform component stretching the axis
/// and a through-depth gradient curving it. The gradient is positive when
/// the +y' face is hotter than the -y' face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalLoad {
    pub bar: u32,
    /// Uniform temperature change [°C]
    pub dt_uniform: f64,
    /// Face-to-face temperature difference [°C]
    pub dt_gradient: f64,
}

impl ThermalLoad {
    pub fn uniform(bar: u32, dt: f64) -> Self {
        Self {
            bar,
            dt_uniform: dt,
            dt_gradient: 0.0,
        }
    }

    pub fn gradient(bar: u32, dt: f64) -> Self {
        Self {
            bar,
            dt_uniform: 0.0,
            dt_gradient: dt,
        }
    }

    pub fn new(bar: u32, dt_uniform: f64, dt_gradient: f64) -> Self {
        Self {
            bar,
            dt_uniform,
            dt_gradient,
        }
    }

    pub fn has_uniform(&self) -> bool {
        self.dt_uniform.abs() > 1e-12
    }

    pub fn has_gradient(&self) -> bool {
        self.dt_gradient.abs() > 1e-12
    }
}
