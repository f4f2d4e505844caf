//! Load case entities.
//!
//! Loads are a tagged union: the engine dispatches on the variant and each
//! variant carries only its own data.

mod distributed;
mod joint_load;
mod point_load;
mod settlement;
mod thermal;

pub use distributed::{DistributedLoad, LoadShape};
pub use joint_load::JointLoad;
pub use point_load::BarPointLoad;
pub use settlement::ImposedDisplacement;
pub use thermal::ThermalLoad;

use serde::{Deserialize, Serialize};

/// Any load applicable to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Load {
    /// Concentrated forces and moment at a joint.
    Joint(JointLoad),
    /// Concentrated force on a bar at a local abscissa.
    BarPoint(BarPointLoad),
    /// Line load over a stretch of a bar.
    BarDistributed(DistributedLoad),
    /// Uniform temperature change and/or through-depth gradient on a bar.
    Thermal(ThermalLoad),
    /// Prescribed support movement at a joint.
    ImposedDisplacement(ImposedDisplacement),
}

impl Load {
    /// Bar referenced by this load, if any.
    pub fn bar(&self) -> Option<u32> {
        match self {
            Load::BarPoint(l) => Some(l.bar),
            Load::BarDistributed(l) => Some(l.bar),
            Load::Thermal(l) => Some(l.bar),
            _ => None,
        }
    }

    /// Joint referenced by this load, if any.
    pub fn joint(&self) -> Option<u32> {
        match self {
            Load::Joint(l) => Some(l.joint),
            Load::ImposedDisplacement(l) => Some(l.joint),
            _ => None,
        }
    }
}
