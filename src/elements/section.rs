//! Cross-section properties.

use serde::{Deserialize, Serialize};

/// Prismatic cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Area [m²]
    pub a: f64,
    /// Moment of inertia about the bending axis [m⁴]
    pub iz: f64,
    /// Section depth [m]; required only for thermal gradients.
    pub h: Option<f64>,
    /// Shear area factor kappa (Timoshenko); 5/6 for rectangles.
    pub kappa: f64,
}

impl Section {
    pub fn new(a: f64, iz: f64) -> Self {
        Self {
            a,
            iz,
            h: None,
            kappa: 5.0 / 6.0,
        }
    }

    pub fn with_depth(mut self, h: f64) -> Self {
        self.h = Some(h);
        self
    }

    pub fn with_shear_factor(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Solid rectangle b × h.
    pub fn rectangular(b: f64, h: f64) -> Self {
        Self {
            a: b * h,
            iz: b * h.powi(3) / 12.0,
            h: Some(h),
            kappa: 5.0 / 6.0,
        }
    }
}
