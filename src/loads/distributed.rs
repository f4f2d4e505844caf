//! Distributed (line) load on a bar.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use crate::elements::BarGeometry;

/// Shape classification of a distributed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadShape {
    Uniform,
    Triangular,
    Trapezoidal,
}

/// Line load of intensity `q1` at `x1` varying linearly to `q2` at `x2`
/// (local abscissas from the i end). `x2 = None` extends to the j end.
/// The direction `angle` [rad] is measured from the bar's local x' axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributedLoad {
    pub bar: u32,
    /// Intensity at `x1` [kN/m]
    pub q1: f64,
    /// Intensity at `x2` [kN/m]
    pub q2: f64,
    /// Start abscissa [m]
    pub x1: f64,
    /// End abscissa [m]; full length when absent
    pub x2: Option<f64>,
    /// Direction from local x' [rad]
    pub angle: f64,
}

impl DistributedLoad {
    pub fn new(bar: u32, q1: f64, q2: f64, x1: f64, x2: Option<f64>, angle: f64) -> Self {
        Self {
            bar,
            q1,
            q2,
            x1,
            x2,
            angle,
        }
    }

    /// Uniform transverse load toward local -y' over the whole bar.
    pub fn uniform_down(bar: u32, q: f64) -> Self {
        Self::new(bar, q.abs(), q.abs(), 0.0, None, -FRAC_PI_2)
    }

    /// Triangular transverse load growing from zero at the i end.
    pub fn triangular_down(bar: u32, q_max: f64) -> Self {
        Self::new(bar, 0.0, q_max.abs(), 0.0, None, -FRAC_PI_2)
    }

    pub fn shape(&self) -> LoadShape {
        let z1 = self.q1.abs() < 1e-12;
        let z2 = self.q2.abs() < 1e-12;
        if (self.q1 - self.q2).abs() < 1e-12 {
            LoadShape::Uniform
        } else if z1 != z2 {
            LoadShape::Triangular
        } else {
            LoadShape::Trapezoidal
        }
    }

    /// End abscissa resolved against the bar length.
    pub fn end(&self, length: f64) -> f64 {
        self.x2.unwrap_or(length)
    }

    pub fn extent(&self, length: f64) -> f64 {
        self.end(length) - self.x1
    }

    /// Intensity at local abscissa `x` (zero outside the loaded stretch).
    pub fn intensity_at(&self, x: f64, length: f64) -> f64 {
        let end = self.end(length);
        if x < self.x1 || x > end {
            return 0.0;
        }
        let span = end - self.x1;
        if span < 1e-12 {
            return self.q1;
        }
        let t = (x - self.x1) / span;
        self.q1 + t * (self.q2 - self.q1)
    }

    /// Magnitude of the resultant [kN].
    pub fn resultant(&self, length: f64) -> f64 {
        (self.q1 + self.q2) / 2.0 * self.extent(length)
    }

    /// Abscissa of the resultant from the i end [m].
    pub fn resultant_position(&self, length: f64) -> f64 {
        let span = self.extent(length);
        let sum = self.q1 + self.q2;
        if span < 1e-12 || sum.abs() < 1e-12 {
            return self.x1 + span / 2.0;
        }
        self.x1 + span * (self.q1 + 2.0 * self.q2) / (3.0 * sum)
    }

    /// Global components of the resultant force.
    pub fn global_resultant(&self, geometry: &BarGeometry) -> (f64, f64) {
        let r = self.resultant(geometry.l);
        let (dx, dy) = geometry.load_direction(self.angle);
        (r * dx, r * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn shape_classification() {
        assert_eq!(DistributedLoad::uniform_down(1, 5.0).shape(), LoadShape::Uniform);
        assert_eq!(
            DistributedLoad::triangular_down(1, 5.0).shape(),
            LoadShape::Triangular
        );
        assert_eq!(
            DistributedLoad::new(1, 2.0, 5.0, 0.0, None, -FRAC_PI_2).shape(),
            LoadShape::Trapezoidal
        );
    }

    #[test]
    fn uniform_resultant_and_centroid() {
        let q = DistributedLoad::uniform_down(1, 10.0);
        assert_relative_eq!(q.resultant(6.0), 60.0);
        assert_relative_eq!(q.resultant_position(6.0), 3.0);
    }

    #[test]
    fn triangular_centroid_at_two_thirds() {
        let q = DistributedLoad::triangular_down(1, 9.0);
        assert_relative_eq!(q.resultant(6.0), 27.0);
        assert_relative_eq!(q.resultant_position(6.0), 4.0);
    }

    #[test]
    fn intensity_interpolates_linearly() {
        let q = DistributedLoad::new(1, 2.0, 6.0, 1.0, Some(5.0), -FRAC_PI_2);
        assert_relative_eq!(q.intensity_at(3.0, 6.0), 4.0);
        assert_eq!(q.intensity_at(0.5, 6.0), 0.0);
        assert_eq!(q.intensity_at(5.5, 6.0), 0.0);
    }
}
