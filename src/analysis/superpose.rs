//! Superposition of the final state and global equilibrium verification.

use std::collections::BTreeMap;

use log::debug;

use crate::analysis::statics::StaticsContext;
use crate::analysis::substructure::Substructure;
use crate::analysis::Redundant;
use crate::elements::Dof;
use crate::error::{FrameError, FrameResult};
use crate::field::ForceField;
use crate::math::moment_about;
use crate::results::Reaction;

/// Absolute equilibrium tolerance, scaled by the load magnitude.
const EQUILIBRIUM_TOL: f64 = 1e-6;

/// Final internal fields: `N = N0 + sum(Xi * Ni)`, same for V and M, as
/// exact polynomial combinations.
pub fn combine_fields(
    primary: &Substructure,
    units: &[Substructure],
    x: &[f64],
) -> FrameResult<BTreeMap<u32, ForceField>> {
    let mut fields = BTreeMap::new();
    for (&bar, base) in &primary.fields {
        let mut terms: Vec<(f64, &ForceField)> = Vec::with_capacity(units.len());
        for (k, unit) in units.iter().enumerate() {
            let field = unit.field(bar).ok_or_else(|| {
                FrameError::InternalFault(format!("missing field for bar {bar} in {}", unit.name))
            })?;
            terms.push((x[k], field));
        }
        fields.insert(bar, base.superpose(&terms));
    }
    Ok(fields)
}

/// Final reactions: superposed over the substructures, with every
/// reaction-kind redundant contributing its own solved value at the
/// released direction.
pub fn combine_reactions(
    primary: &Substructure,
    units: &[Substructure],
    redundants: &[Redundant],
    x: &[f64],
) -> BTreeMap<u32, Reaction> {
    let mut reactions = primary.reactions.clone();
    for (k, unit) in units.iter().enumerate() {
        for (&joint, r) in &unit.reactions {
            let entry = reactions.entry(joint).or_default();
            entry.fx += x[k] * r.fx;
            entry.fy += x[k] * r.fy;
            entry.mz += x[k] * r.mz;
        }
    }
    for (k, redundant) in redundants.iter().enumerate() {
        if let Some((joint, dof)) = redundant.reaction_target() {
            let entry = reactions.entry(joint).or_default();
            match dof {
                Dof::Ux => entry.fx += x[k],
                Dof::Uy => entry.fy += x[k],
                Dof::Rz => entry.mz += x[k],
            }
        }
    }
    reactions
}

/// Check that applied loads and reactions cancel. Returns the residuals
/// for the diagnostics; exceeding tolerance is a hard error.
pub fn verify_equilibrium(
    ctx: &StaticsContext<'_>,
    primary: &Substructure,
    reactions: &BTreeMap<u32, Reaction>,
) -> FrameResult<(f64, f64, f64)> {
    let (ext_fx, ext_fy, ext_m) = ctx.external_sums(&primary.loads);
    let (mut fx, mut fy, mut m) = (ext_fx, ext_fy, ext_m);
    let mut magnitude = ext_fx.abs().max(ext_fy.abs()).max(ext_m.abs());
    for (&joint, r) in reactions {
        let jt = ctx.model.joint(joint)?;
        fx += r.fx;
        fy += r.fy;
        m += moment_about(r.fx, r.fy, jt.x, jt.y, 0.0, 0.0) + r.mz;
        magnitude = magnitude.max(r.force_magnitude()).max(r.mz.abs());
    }
    let tol = EQUILIBRIUM_TOL * magnitude.max(1.0);
    debug!("equilibrium residuals: Fx = {fx:.3e}, Fy = {fy:.3e}, Mz = {m:.3e}");
    if fx.abs() > tol || fy.abs() > tol || m.abs() > tol {
        return Err(FrameError::EquilibriumViolation { fx, fy, mz: m });
    }
    Ok((fx, fy, m))
}
