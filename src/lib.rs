//! flexframe - Force-method analysis of 2D planar frames
//!
//! This library analyzes statically indeterminate plane frames by the
//! classical force (flexibility) method:
//! - determinacy counting and geometric stability checks
//! - automatic or manual redundant selection with backtracking
//! - isostatic substructures solved by global equilibrium and the
//!   method of sections, with exact piecewise-polynomial diagrams
//! - flexibility coefficients by virtual work (Simpson integration),
//!   including thermal strains, elastic supports and support movements
//! - the compatibility system `F·X = eh - e0` with conditioning guards
//! - superposed internal fields, reactions, joint displacements and
//!   elastic curves, verified against global equilibrium
//!
//! Units are kN and m throughout; the sign convention is the TERNA rule
//! of the moment formula `M = -Fy·(xp - xf) + Fx·(yp - yf)`.
//!
//! ## Example
//! ```rust
//! use flexframe::prelude::*;
//!
//! let mut model = FrameModel::new("fixed-fixed beam");
//!
//! model.add_material("Steel", Material::steel()).unwrap();
//! model.add_section("IPE200", Section::new(28.5e-4, 2.772e-5)).unwrap();
//!
//! model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
//! model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
//! model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
//!
//! model.set_support(1, Support::Fixed).unwrap();
//! model.set_support(2, Support::Fixed).unwrap();
//!
//! model
//!     .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 3.0)))
//!     .unwrap();
//!
//! let result = model.analyze(&AnalysisOptions::default()).unwrap();
//! assert_eq!(result.gh, 3);
//! let m_mid = result.m(1, 3.0);
//! assert!((m_mid + 7.5).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod field;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        AnalysisOptions, CancelFlag, Progress, Redundant, SolverKind,
    };
    pub use crate::elements::{
        Bar, Dof, Joint, Material, RollerDirection, Section, Support,
    };
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::field::ForceField;
    pub use crate::loads::{
        BarPointLoad, DistributedLoad, ImposedDisplacement, JointLoad, Load, LoadShape,
        ThermalLoad,
    };
    pub use crate::model::FrameModel;
    pub use crate::results::{
        AnalysisResult, DeflectionCurve, Diagnostics, JointDisplacement, Reaction,
    };
}
