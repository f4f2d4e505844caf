//! Substructure construction for the force method.
//!
//! Releasing the chosen redundants turns the model into an isostatic
//! primary structure; every redundant then gets a clone of that primary
//! loaded by a single unit generalized force.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::Redundant;
use crate::elements::Dof;
use crate::error::{FrameError, FrameResult};
use crate::field::ForceField;
use crate::loads::{BarPointLoad, DistributedLoad, JointLoad, Load};
use crate::model::FrameModel;
use crate::results::Reaction;

/// Retained rigid restraints per joint in a substructure.
pub type SupportMap = BTreeMap<u32, Vec<Dof>>;

/// Internal action released at a bar site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseKind {
    Moment,
    Shear,
    Axial,
}

/// A release site on a bar: the structure transmits a zero action of the
/// given kind across the section at local abscissa `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReleaseSite {
    pub bar: u32,
    pub x: f64,
    pub kind: ReleaseKind,
}

/// The loads of one substructure. Real loads for the primary; a single
/// unit action for each unit-load case. `pairs` holds equal-and-opposite
/// unit actions applied across a release site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseLoads {
    pub joint: Vec<JointLoad>,
    pub bar_point: Vec<BarPointLoad>,
    pub bar_dist: Vec<DistributedLoad>,
    pub pairs: Vec<ReleaseSite>,
}

impl CaseLoads {
    pub fn is_empty(&self) -> bool {
        self.joint.is_empty()
            && self.bar_point.is_empty()
            && self.bar_dist.is_empty()
            && self.pairs.is_empty()
    }
}

/// One load configuration over the shared primary geometry, with its
/// computed reactions and internal fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substructure {
    pub name: String,
    pub supports: SupportMap,
    pub releases: Vec<ReleaseSite>,
    pub loads: CaseLoads,
    pub reactions: BTreeMap<u32, Reaction>,
    pub fields: BTreeMap<u32, ForceField>,
}

impl Substructure {
    pub fn reaction(&self, joint: u32) -> Reaction {
        self.reactions.get(&joint).copied().unwrap_or_default()
    }

    pub fn reaction_component(&self, joint: u32, dof: Dof) -> f64 {
        let r = self.reaction(joint);
        match dof {
            Dof::Ux => r.fx,
            Dof::Uy => r.fy,
            Dof::Rz => r.mz,
        }
    }

    pub fn field(&self, bar: u32) -> Option<&ForceField> {
        self.fields.get(&bar)
    }
}

/// Retained restraints after releasing the reaction-kind redundants.
pub fn primary_supports(model: &FrameModel, redundants: &[Redundant]) -> SupportMap {
    let mut map = SupportMap::new();
    for (&joint, support) in &model.supports {
        let mut dofs = support.restrained_dofs();
        dofs.retain(|dof| {
            !redundants
                .iter()
                .any(|r| r.reaction_target() == Some((joint, *dof)))
        });
        if !dofs.is_empty() {
            map.insert(joint, dofs);
        }
    }
    map
}

/// Release sites of the primary: the model's own end hinges plus the
/// internal-release redundants.
pub fn primary_releases(model: &FrameModel, redundants: &[Redundant]) -> FrameResult<Vec<ReleaseSite>> {
    let mut sites = Vec::new();
    for (&id, bar) in &model.bars {
        let geometry = model.bar_geometry(id)?;
        if bar.hinge_i {
            sites.push(ReleaseSite {
                bar: id,
                x: 0.0,
                kind: ReleaseKind::Moment,
            });
        }
        if bar.hinge_j {
            sites.push(ReleaseSite {
                bar: id,
                x: geometry.l,
                kind: ReleaseKind::Moment,
            });
        }
    }
    for r in redundants {
        if let Some((bar, x)) = r.internal_site() {
            let kind = match r {
                Redundant::InternalMoment { .. } => ReleaseKind::Moment,
                Redundant::InternalShear { .. } => ReleaseKind::Shear,
                Redundant::InternalAxial { .. } => ReleaseKind::Axial,
                _ => unreachable!(),
            };
            let site = ReleaseSite { bar, x, kind };
            if sites.iter().any(|s| {
                s.bar == site.bar && (s.x - site.x).abs() < 1e-9 && s.kind == site.kind
            }) {
                return Err(FrameError::RedundantSelection(format!(
                    "duplicate internal release on bar {bar} at x = {x:.3}"
                )));
            }
            sites.push(site);
        }
    }
    Ok(sites)
}

/// Real load case of the primary. Thermal and imposed-displacement loads
/// produce no forces on an isostatic structure; they enter the
/// flexibility stage instead.
pub fn primary_loads(model: &FrameModel) -> CaseLoads {
    let mut loads = CaseLoads::default();
    for load in &model.loads {
        match load {
            Load::Joint(l) => loads.joint.push(*l),
            Load::BarPoint(l) => loads.bar_point.push(*l),
            Load::BarDistributed(l) => loads.bar_dist.push(*l),
            Load::Thermal(_) | Load::ImposedDisplacement(_) => {}
        }
    }
    loads
}

/// Unit generalized force for one redundant: a unit force or moment at a
/// released support direction, or a unit pair across an internal release.
pub fn unit_loads(redundant: &Redundant) -> CaseLoads {
    let mut loads = CaseLoads::default();
    match *redundant {
        Redundant::ReactionX { joint } => loads.joint.push(JointLoad::new(joint, 1.0, 0.0, 0.0)),
        Redundant::ReactionY { joint } => loads.joint.push(JointLoad::new(joint, 0.0, 1.0, 0.0)),
        Redundant::ReactionMoment { joint } => loads.joint.push(JointLoad::moment(joint, 1.0)),
        Redundant::SpringReaction { joint, dof } => loads.joint.push(match dof {
            Dof::Ux => JointLoad::new(joint, 1.0, 0.0, 0.0),
            Dof::Uy => JointLoad::new(joint, 0.0, 1.0, 0.0),
            Dof::Rz => JointLoad::moment(joint, 1.0),
        }),
        Redundant::InternalMoment { bar, x } => loads.pairs.push(ReleaseSite {
            bar,
            x,
            kind: ReleaseKind::Moment,
        }),
        Redundant::InternalShear { bar, x } => loads.pairs.push(ReleaseSite {
            bar,
            x,
            kind: ReleaseKind::Shear,
        }),
        Redundant::InternalAxial { bar, x } => loads.pairs.push(ReleaseSite {
            bar,
            x,
            kind: ReleaseKind::Axial,
        }),
    }
    loads
}

/// Build the primary and the unit-load substructures (fields still empty;
/// the statics stage fills them in).
pub fn generate(
    model: &FrameModel,
    redundants: &[Redundant],
) -> FrameResult<(Substructure, Vec<Substructure>)> {
    let supports = primary_supports(model, redundants);
    let releases = primary_releases(model, redundants)?;

    let primary = Substructure {
        name: "primary".to_string(),
        supports: supports.clone(),
        releases: releases.clone(),
        loads: primary_loads(model),
        reactions: BTreeMap::new(),
        fields: BTreeMap::new(),
    };

    let units = redundants
        .iter()
        .enumerate()
        .map(|(k, r)| Substructure {
            name: format!("X{}", k + 1),
            supports: supports.clone(),
            releases: releases.clone(),
            loads: unit_loads(r),
            reactions: BTreeMap::new(),
            fields: BTreeMap::new(),
        })
        .collect();

    Ok((primary, units))
}
