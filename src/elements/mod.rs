//! Structural entities: joints, bars, materials, sections, supports.

mod bar;
mod joint;
mod material;
mod section;
mod support;

pub use bar::{Bar, BarGeometry, LENGTH_TOLERANCE};
pub use joint::Joint;
pub use material::Material;
pub use section::Section;
pub use support::{Dof, RollerDirection, Support};
