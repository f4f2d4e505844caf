//! External support conditions.

use serde::{Deserialize, Serialize};

/// Planar degree of freedom at a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dof {
    /// Horizontal translation
    Ux,
    /// Vertical translation
    Uy,
    /// In-plane rotation
    Rz,
}

impl Dof {
    pub const ALL: [Dof; 3] = [Dof::Ux, Dof::Uy, Dof::Rz];
}

/// Translation axis restrained by a roller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollerDirection {
    /// Rolls on a vertical surface: restrains Ux.
    X,
    /// Rolls on a horizontal surface: restrains Uy.
    Y,
}

/// Support condition at a joint.
///
/// Each variant carries only its own data; the engine dispatches on the
/// tag, which keeps the restraint bookkeeping exhaustively checkable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Support {
    /// All three degrees of freedom restrained.
    Fixed,
    /// Both translations restrained, rotation free.
    Pinned,
    /// One translation restrained.
    Roller { direction: RollerDirection },
    /// Translation across the guide and rotation restrained; sliding free.
    Guide { free_direction: RollerDirection },
    /// Elastic restraint with finite stiffnesses [kN/m, kN/m, kNm/rad].
    Elastic { kx: f64, ky: f64, ktheta: f64 },
}

impl Support {
    pub fn elastic(kx: f64, ky: f64, ktheta: f64) -> Self {
        Support::Elastic { kx, ky, ktheta }
    }

    /// Degrees of freedom this support restrains, in Ux, Uy, Rz order.
    /// Elastic directions with positive stiffness count as restrained; the
    /// compliance enters the flexibility matrix later.
    pub fn restrained_dofs(&self) -> Vec<Dof> {
        match *self {
            Support::Fixed => vec![Dof::Ux, Dof::Uy, Dof::Rz],
            Support::Pinned => vec![Dof::Ux, Dof::Uy],
            Support::Roller { direction } => match direction {
                RollerDirection::X => vec![Dof::Ux],
                RollerDirection::Y => vec![Dof::Uy],
            },
            Support::Guide { free_direction } => match free_direction {
                RollerDirection::X => vec![Dof::Uy, Dof::Rz],
                RollerDirection::Y => vec![Dof::Ux, Dof::Rz],
            },
            Support::Elastic { kx, ky, ktheta } => {
                let mut dofs = Vec::new();
                if kx > 0.0 {
                    dofs.push(Dof::Ux);
                }
                if ky > 0.0 {
                    dofs.push(Dof::Uy);
                }
                if ktheta > 0.0 {
                    dofs.push(Dof::Rz);
                }
                dofs
            }
        }
    }

    pub fn restrains(&self, dof: Dof) -> bool {
        self.restrained_dofs().contains(&dof)
    }

    pub fn restraint_count(&self) -> usize {
        self.restrained_dofs().len()
    }

    /// Spring stiffness in the given direction, if this is an elastic
    /// support with a positive stiffness there.
    pub fn spring_stiffness(&self, dof: Dof) -> Option<f64> {
        match *self {
            Support::Elastic { kx, ky, ktheta } => {
                let k = match dof {
                    Dof::Ux => kx,
                    Dof::Uy => ky,
                    Dof::Rz => ktheta,
                };
                (k > 0.0).then_some(k)
            }
            _ => None,
        }
    }

    pub fn is_elastic(&self) -> bool {
        matches!(self, Support::Elastic { .. })
    }
}
