//! Material properties.

use serde::{Deserialize, Serialize};

/// Material for prismatic bars.
///
/// Units follow the rest of the crate: kN and m, so `e` is in kN/m².
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity [kN/m²]
    pub e: f64,
    /// Thermal expansion coefficient [1/°C]
    pub alpha: f64,
    /// Shear modulus [kN/m²]; only needed for Timoshenko runs.
    pub g: Option<f64>,
}

impl Material {
    pub fn new(e: f64, alpha: f64) -> Self {
        Self { e, alpha, g: None }
    }

    pub fn with_shear_modulus(mut self, g: f64) -> Self {
        self.g = Some(g);
        self
    }

    /// Shear modulus, defaulting to `E / 2.6` (nu = 0.3) when unset.
    pub fn shear_modulus(&self) -> f64 {
        self.g.unwrap_or(self.e / 2.6)
    }

    /// Structural steel: E = 200 GPa, alpha = 1.2e-5 /°C.
    pub fn steel() -> Self {
        Self {
            e: 200e6,
            alpha: 1.2e-5,
            g: Some(77e6),
        }
    }

    /// Generic concrete: E = 30 GPa, alpha = 1.0e-5 /°C.
    pub fn concrete() -> Self {
        Self {
            e: 30e6,
            alpha: 1.0e-5,
            g: None,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
