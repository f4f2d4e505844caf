//! Joint displacements by the unit-load theorem and per-bar elastic
//! curves.
//!
//! A unit force on the primary structure, integrated against the final
//! force fields, yields the displacement at any free degree of freedom.
//! Thermal strains, movements of retained supports and the compliance of
//! retained springs enter the same work sum. Restrained directions
//! report their prescribed value, or `-R/k` on springs.

use std::collections::BTreeMap;

use crate::analysis::flexibility::{bar_stiffness, field_integral, product_integral};
use crate::analysis::statics::StaticsContext;
use crate::analysis::substructure::{CaseLoads, Substructure};
use crate::analysis::AnalysisOptions;
use crate::elements::Dof;
use crate::error::{FrameError, FrameResult};
use crate::field::ForceField;
use crate::loads::{JointLoad, Load};
use crate::math::Poly;
use crate::model::FrameModel;
use crate::results::{DeflectionCurve, JointDisplacement, Reaction};

/// Imposed displacement components at a joint, summed over the load case.
fn imposed_at(model: &FrameModel, joint: u32) -> (f64, f64, f64) {
    let (mut dx, mut dy, mut dtheta) = (0.0, 0.0, 0.0);
    for load in &model.loads {
        if let Load::ImposedDisplacement(l) = load {
            if l.joint == joint {
                dx += l.dx;
                dy += l.dy;
                dtheta += l.dtheta;
            }
        }
    }
    (dx, dy, dtheta)
}

/// Work integral of one solved unit case against the final state.
fn unit_work(
    ctx: &StaticsContext<'_>,
    options: &AnalysisOptions,
    unit: &Substructure,
    final_fields: &BTreeMap<u32, ForceField>,
    final_reactions: &BTreeMap<u32, Reaction>,
) -> FrameResult<f64> {
    let model = ctx.model;
    let mut delta = 0.0;

    for (&bar, final_field) in final_fields {
        let k = bar_stiffness(model, bar)?;
        let unit_field = unit.field(bar).ok_or_else(|| {
            FrameError::InternalFault(format!("missing field for bar {bar} in {}", unit.name))
        })?;
        delta += product_integral(options, bar, unit_field, final_field, &k)?;
    }

    for load in &model.loads {
        let Load::Thermal(thermal) = load else {
            continue;
        };
        let material = model.bar_material(thermal.bar)?;
        let section = model.bar_section(thermal.bar)?;
        let field = unit.field(thermal.bar).ok_or_else(|| {
            FrameError::InternalFault(format!(
                "missing field for bar {} in {}",
                thermal.bar, unit.name
            ))
        })?;
        if thermal.has_uniform() {
            let n_int = field_integral(options, thermal.bar, field, |s| &s.n)?;
            delta += material.alpha * thermal.dt_uniform * n_int;
        }
        if thermal.has_gradient() {
            let h = section.h.unwrap_or(0.0);
            let m_int = field_integral(options, thermal.bar, field, |s| &s.m)?;
            delta += material.alpha * thermal.dt_gradient / h * m_int;
        }
    }

    // movements of the supports retained in the primary
    for (&joint, dofs) in &unit.supports {
        let (dx, dy, dtheta) = imposed_at(model, joint);
        for &dof in dofs {
            let value = match dof {
                Dof::Ux => dx,
                Dof::Uy => dy,
                Dof::Rz => dtheta,
            };
            if value.abs() > 1e-15 {
                delta -= unit.reaction_component(joint, dof) * value;
            }
        }
    }

    // compliance of springs retained in the primary
    for (&joint, support) in &model.supports {
        for dof in support.restrained_dofs() {
            let Some(stiffness) = support.spring_stiffness(dof) else {
                continue;
            };
            let retained = unit
                .supports
                .get(&joint)
                .is_some_and(|dofs| dofs.contains(&dof));
            if !retained {
                continue;
            }
            let r_final = final_reactions
                .get(&joint)
                .map(|r| match dof {
                    Dof::Ux => r.fx,
                    Dof::Uy => r.fy,
                    Dof::Rz => r.mz,
                })
                .unwrap_or(0.0);
            delta += unit.reaction_component(joint, dof) * r_final / stiffness;
        }
    }

    Ok(delta)
}

/// Displacements of every joint in the final state.
pub fn joint_displacements(
    ctx: &StaticsContext<'_>,
    options: &AnalysisOptions,
    primary: &Substructure,
    final_fields: &BTreeMap<u32, ForceField>,
    final_reactions: &BTreeMap<u32, Reaction>,
) -> FrameResult<BTreeMap<u32, JointDisplacement>> {
    let model = ctx.model;
    let mut displacements = BTreeMap::new();

    for &joint in model.joints.keys() {
        let support = model.supports.get(&joint);
        let (imp_dx, imp_dy, imp_dtheta) = imposed_at(model, joint);
        let mut out = JointDisplacement::default();

        for dof in Dof::ALL {
            let restrained = support.is_some_and(|s| s.restrains(dof));
            let value = if restrained {
                let spring = support.and_then(|s| s.spring_stiffness(dof));
                if let Some(k) = spring {
                    let r = final_reactions
                        .get(&joint)
                        .map(|r| match dof {
                            Dof::Ux => r.fx,
                            Dof::Uy => r.fy,
                            Dof::Rz => r.mz,
                        })
                        .unwrap_or(0.0);
                    -r / k
                } else {
                    match dof {
                        Dof::Ux => imp_dx,
                        Dof::Uy => imp_dy,
                        Dof::Rz => imp_dtheta,
                    }
                }
            } else {
                let mut probe = Substructure {
                    name: format!("probe {dof:?} at joint {joint}"),
                    supports: primary.supports.clone(),
                    releases: primary.releases.clone(),
                    loads: CaseLoads {
                        joint: vec![match dof {
                            Dof::Ux => JointLoad::new(joint, 1.0, 0.0, 0.0),
                            Dof::Uy => JointLoad::new(joint, 0.0, 1.0, 0.0),
                            Dof::Rz => JointLoad::moment(joint, 1.0),
                        }],
                        ..Default::default()
                    },
                    reactions: BTreeMap::new(),
                    fields: BTreeMap::new(),
                };
                ctx.solve_case(&mut probe)?;
                unit_work(ctx, options, &probe, final_fields, final_reactions)?
            };
            match dof {
                Dof::Ux => out.ux = value,
                Dof::Uy => out.uy = value,
                Dof::Rz => out.rz = value,
            }
        }
        displacements.insert(joint, out);
    }
    Ok(displacements)
}

/// Elastic curve of every bar, integrated from the bending field with end
/// conditions taken from the joint displacements. With the hogging-
/// positive moment of this model the curvature relation is
/// `dtheta/dx = -M/EI`; `v` is positive toward the local +y' side.
pub fn deflection_curves(
    ctx: &StaticsContext<'_>,
    final_fields: &BTreeMap<u32, ForceField>,
    displacements: &BTreeMap<u32, JointDisplacement>,
) -> FrameResult<BTreeMap<u32, DeflectionCurve>> {
    let model = ctx.model;
    let mut curves = BTreeMap::new();

    for (&bar_id, field) in final_fields {
        let bar = model.bar(bar_id)?;
        let geometry = ctx.geometry[&bar_id];
        let k = bar_stiffness(model, bar_id)?;

        let start = displacements
            .get(&bar.i_joint)
            .copied()
            .unwrap_or_default();
        let mut theta_c = start.rz;
        let mut v_c = start.ux * geometry.normal.0 + start.uy * geometry.normal.1;

        let mut breaks = Vec::with_capacity(field.segments.len() + 1);
        let mut theta = Vec::with_capacity(field.segments.len());
        let mut v = Vec::with_capacity(field.segments.len());
        for seg in &field.segments {
            breaks.push(seg.x0);
            let m_anti = seg.m.antiderivative().scale(-1.0 / k.ei);
            let theta_poly = m_anti.add(&Poly::constant(theta_c - m_anti.eval(seg.x0)));
            let t_anti = theta_poly.antiderivative();
            let v_poly = t_anti.add(&Poly::constant(v_c - t_anti.eval(seg.x0)));
            theta_c = theta_poly.eval(seg.x1);
            v_c = v_poly.eval(seg.x1);
            theta.push(theta_poly);
            v.push(v_poly);
        }
        breaks.push(geometry.l);

        curves.insert(
            bar_id,
            DeflectionCurve {
                bar: bar_id,
                length: geometry.l,
                breaks,
                theta,
                v,
            },
        );
    }
    Ok(curves)
}
