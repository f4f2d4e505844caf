//! Joint (node) of the planar frame.

use serde::{Deserialize, Serialize};

/// A joint in the plane. Joints are owned by the model and referenced by
/// their integer id everywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    /// X coordinate [m]
    pub x: f64,
    /// Y coordinate [m]
    pub y: f64,
}

impl Joint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Joint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Joint::new(0.0, 0.0);
        let b = Joint::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
