//! Structural model: the single owner of all entities.
//!
//! Bars, supports and loads reference joints by integer id and materials
//! and sections by name; the maps below are the only ownership location.
//! Ordered maps keep every iteration deterministic, which the analysis
//! relies on for reproducible diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::elements::{Bar, BarGeometry, Dof, Joint, Material, Section, Support, LENGTH_TOLERANCE};
use crate::error::{FrameError, FrameResult};
use crate::loads::Load;

/// The planar frame model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameModel {
    /// Optional human-readable name
    pub name: String,
    /// Joints by id
    pub joints: BTreeMap<u32, Joint>,
    /// Materials by name
    pub materials: BTreeMap<String, Material>,
    /// Sections by name
    pub sections: BTreeMap<String, Section>,
    /// Bars by id
    pub bars: BTreeMap<u32, Bar>,
    /// Supports keyed by joint id
    pub supports: BTreeMap<u32, Support>,
    /// Applied load case
    pub loads: Vec<Load>,
}

impl FrameModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    // ========================
    // Model building
    // ========================

    pub fn add_joint(&mut self, id: u32, joint: Joint) -> FrameResult<()> {
        if !joint.x.is_finite() || !joint.y.is_finite() {
            return Err(FrameError::InvalidGeometry(format!(
                "joint {id} has non-finite coordinates"
            )));
        }
        if self.joints.contains_key(&id) {
            return Err(FrameError::DuplicateId { kind: "joint", id });
        }
        self.joints.insert(id, joint);
        Ok(())
    }

    pub fn add_material(&mut self, name: &str, material: Material) -> FrameResult<()> {
        if self.materials.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.materials.insert(name.to_string(), material);
        Ok(())
    }

    pub fn add_section(&mut self, name: &str, section: Section) -> FrameResult<()> {
        if self.sections.contains_key(name) {
            return Err(FrameError::DuplicateName(name.to_string()));
        }
        self.sections.insert(name.to_string(), section);
        Ok(())
    }

    pub fn add_bar(&mut self, id: u32, bar: Bar) -> FrameResult<()> {
        if self.bars.contains_key(&id) {
            return Err(FrameError::DuplicateId { kind: "bar", id });
        }
        let i = self
            .joints
            .get(&bar.i_joint)
            .ok_or(FrameError::JointNotFound(bar.i_joint))?;
        let j = self
            .joints
            .get(&bar.j_joint)
            .ok_or(FrameError::JointNotFound(bar.j_joint))?;
        if bar.i_joint == bar.j_joint {
            return Err(FrameError::InvalidGeometry(format!(
                "bar {id} connects joint {} to itself",
                bar.i_joint
            )));
        }
        if i.distance_to(j) < LENGTH_TOLERANCE {
            return Err(FrameError::InvalidGeometry(format!(
                "bar {id} has near-zero length {:.3e} m",
                i.distance_to(j)
            )));
        }
        if !self.materials.contains_key(&bar.material) {
            return Err(FrameError::MaterialNotFound(bar.material.clone()));
        }
        if !self.sections.contains_key(&bar.section) {
            return Err(FrameError::SectionNotFound(bar.section.clone()));
        }
        self.bars.insert(id, bar);
        Ok(())
    }

    pub fn set_support(&mut self, joint: u32, support: Support) -> FrameResult<()> {
        if !self.joints.contains_key(&joint) {
            return Err(FrameError::JointNotFound(joint));
        }
        if let Support::Elastic { kx, ky, ktheta } = support {
            if kx < 0.0 || ky < 0.0 || ktheta < 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "elastic support at joint {joint} has a negative stiffness"
                )));
            }
            if kx == 0.0 && ky == 0.0 && ktheta == 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "elastic support at joint {joint} needs at least one positive stiffness"
                )));
            }
        }
        self.supports.insert(joint, support);
        Ok(())
    }

    pub fn add_load(&mut self, load: Load) -> FrameResult<()> {
        self.check_load(&load)?;
        self.loads.push(load);
        Ok(())
    }

    fn check_load(&self, load: &Load) -> FrameResult<()> {
        if let Some(joint) = load.joint() {
            if !self.joints.contains_key(&joint) {
                return Err(FrameError::JointNotFound(joint));
            }
        }
        if let Some(bar) = load.bar() {
            if !self.bars.contains_key(&bar) {
                return Err(FrameError::BarNotFound(bar));
            }
        }
        match load {
            Load::BarPoint(l) => {
                let length = self.bar_geometry(l.bar)?.l;
                if l.a < 0.0 || l.a > length {
                    return Err(FrameError::InvalidLoad(format!(
                        "point load on bar {} at a = {} outside [0, {}]",
                        l.bar, l.a, length
                    )));
                }
            }
            Load::BarDistributed(l) => {
                let length = self.bar_geometry(l.bar)?.l;
                let end = l.end(length);
                if l.x1 < 0.0 || end > length + 1e-12 || end < l.x1 {
                    return Err(FrameError::InvalidLoad(format!(
                        "distributed load on bar {} spans [{}, {}] outside [0, {}]",
                        l.bar, l.x1, end, length
                    )));
                }
            }
            Load::Thermal(l) => {
                if l.has_gradient() {
                    let bar = &self.bars[&l.bar];
                    let section = &self.sections[&bar.section];
                    if section.h.unwrap_or(0.0) <= 0.0 {
                        return Err(FrameError::InvalidLoad(format!(
                            "thermal gradient on bar {} requires a section depth",
                            l.bar
                        )));
                    }
                }
            }
            Load::ImposedDisplacement(l) => {
                let support = self.supports.get(&l.joint).ok_or_else(|| {
                    FrameError::InvalidLoad(format!(
                        "imposed displacement at unsupported joint {}",
                        l.joint
                    ))
                })?;
                let components = [
                    (l.dx, Dof::Ux),
                    (l.dy, Dof::Uy),
                    (l.dtheta, Dof::Rz),
                ];
                for (value, dof) in components {
                    if value.abs() > 1e-15 && !support.restrains(dof) {
                        return Err(FrameError::InvalidLoad(format!(
                            "imposed {dof:?} at joint {} has no restraint there",
                            l.joint
                        )));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ========================
    // Lookups
    // ========================

    pub fn joint(&self, id: u32) -> FrameResult<&Joint> {
        self.joints.get(&id).ok_or(FrameError::JointNotFound(id))
    }

    pub fn bar(&self, id: u32) -> FrameResult<&Bar> {
        self.bars.get(&id).ok_or(FrameError::BarNotFound(id))
    }

    pub fn bar_geometry(&self, id: u32) -> FrameResult<BarGeometry> {
        let bar = self.bar(id)?;
        Ok(BarGeometry::from_joints(
            self.joint(bar.i_joint)?,
            self.joint(bar.j_joint)?,
        ))
    }

    pub fn bar_material(&self, id: u32) -> FrameResult<&Material> {
        let bar = self.bar(id)?;
        self.materials
            .get(&bar.material)
            .ok_or_else(|| FrameError::MaterialNotFound(bar.material.clone()))
    }

    pub fn bar_section(&self, id: u32) -> FrameResult<&Section> {
        let bar = self.bar(id)?;
        self.sections
            .get(&bar.section)
            .ok_or_else(|| FrameError::SectionNotFound(bar.section.clone()))
    }

    /// Bars connected to a joint, ascending by id.
    pub fn bars_at_joint(&self, joint: u32) -> Vec<u32> {
        self.bars
            .iter()
            .filter(|(_, b)| b.i_joint == joint || b.j_joint == joint)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Total number of externally restrained degrees of freedom. Elastic
    /// directions with positive stiffness count as restrained.
    pub fn restraint_count(&self) -> usize {
        self.supports.values().map(Support::restraint_count).sum()
    }

    /// Total number of internal moment releases.
    pub fn release_count(&self) -> usize {
        self.bars.values().map(Bar::release_count).sum()
    }

    /// Degree of static indeterminacy: `gh = r + 3b - 3n - releases`.
    pub fn degree_of_indeterminacy(&self) -> i32 {
        let r = self.restraint_count() as i32;
        let b = self.bars.len() as i32;
        let n = self.joints.len() as i32;
        let v = self.release_count() as i32;
        r + 3 * b - 3 * n - v
    }

    // ========================
    // Validation
    // ========================

    /// Full pre-analysis validation; every failure names the offending
    /// entity.
    pub fn validate(&self) -> FrameResult<()> {
        if self.joints.len() < 2 {
            return Err(FrameError::InvalidGeometry(
                "model needs at least two joints".to_string(),
            ));
        }
        if self.bars.is_empty() {
            return Err(FrameError::InvalidGeometry(
                "model needs at least one bar".to_string(),
            ));
        }
        if self.supports.is_empty() {
            return Err(FrameError::InvalidGeometry(
                "model has no external supports".to_string(),
            ));
        }
        for &id in self.bars.keys() {
            let geometry = self.bar_geometry(id)?;
            if geometry.l < LENGTH_TOLERANCE {
                return Err(FrameError::InvalidGeometry(format!(
                    "bar {id} has near-zero length {:.3e} m",
                    geometry.l
                )));
            }
            let material = self.bar_material(id)?;
            if material.e <= 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "bar {id}: modulus of elasticity must be positive (E = {})",
                    material.e
                )));
            }
            if material.alpha < 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "bar {id}: thermal coefficient must be non-negative"
                )));
            }
            let section = self.bar_section(id)?;
            if section.a <= 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "bar {id}: section area must be positive (A = {})",
                    section.a
                )));
            }
            if section.iz <= 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "bar {id}: section inertia must be positive (Iz = {})",
                    section.iz
                )));
            }
            if section.kappa <= 0.0 {
                return Err(FrameError::InvalidProperty(format!(
                    "bar {id}: shear factor must be positive"
                )));
            }
        }
        for load in &self.loads {
            self.check_load(load)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{BarPointLoad, JointLoad};

    fn beam_model() -> FrameModel {
        let mut model = FrameModel::new("beam");
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
        model.add_material("steel", Material::steel()).unwrap();
        model
            .add_section("ipe", Section::new(28.5e-4, 2.772e-5))
            .unwrap();
        model.add_bar(1, Bar::new(1, 2, "steel", "ipe")).unwrap();
        model
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut model = beam_model();
        assert!(matches!(
            model.add_joint(1, Joint::new(1.0, 1.0)),
            Err(FrameError::DuplicateId { kind: "joint", .. })
        ));
        assert!(matches!(
            model.add_bar(1, Bar::new(1, 2, "steel", "ipe")),
            Err(FrameError::DuplicateId { kind: "bar", .. })
        ));
    }

    #[test]
    fn rejects_zero_length_bar() {
        let mut model = beam_model();
        model.add_joint(3, Joint::new(0.0, 1e-10)).unwrap();
        assert!(matches!(
            model.add_bar(2, Bar::new(1, 3, "steel", "ipe")),
            Err(FrameError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_point_load() {
        let mut model = beam_model();
        model.set_support(1, Support::Fixed).unwrap();
        assert!(matches!(
            model.add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 7.0))),
            Err(FrameError::InvalidLoad(_))
        ));
    }

    #[test]
    fn rejects_load_on_missing_entities() {
        let mut model = beam_model();
        assert!(matches!(
            model.add_load(Load::Joint(JointLoad::vertical_down(9, 1.0))),
            Err(FrameError::JointNotFound(9))
        ));
    }

    #[test]
    fn fixed_fixed_beam_is_three_times_indeterminate() {
        let mut model = beam_model();
        model.set_support(1, Support::Fixed).unwrap();
        model.set_support(2, Support::Fixed).unwrap();
        assert_eq!(model.degree_of_indeterminacy(), 3);
    }

    #[test]
    fn hinge_lowers_the_count() {
        let mut model = beam_model();
        model.set_support(1, Support::Fixed).unwrap();
        model.set_support(2, Support::Fixed).unwrap();
        model.bars.get_mut(&1).unwrap().hinge_j = true;
        assert_eq!(model.degree_of_indeterminacy(), 2);
    }

    #[test]
    fn cantilever_is_isostatic() {
        let mut model = beam_model();
        model.set_support(1, Support::Fixed).unwrap();
        assert_eq!(model.degree_of_indeterminacy(), 0);
        model.validate().unwrap();
    }
}
