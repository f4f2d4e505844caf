//! Virtual-work assembly of the flexibility matrix and load terms.
//!
//! `F[i][j] = sum over bars of integral(Mi*Mj/EI + Ni*Nj/EA) dx`, with the
//! shear term added in Timoshenko mode. The independent vector gathers the
//! primary-load work, thermal strains, support movements off the redundant
//! directions and the compliance of springs kept in the primary.

use log::warn;

use crate::analysis::substructure::Substructure;
use crate::analysis::{AnalysisOptions, Redundant};
use crate::error::{FrameError, FrameResult};
use crate::field::ForceField;
use crate::loads::Load;
use crate::math::{self, merge_breaks, Mat, Vec as DVec};
use crate::model::FrameModel;
use crate::analysis::statics::StaticsContext;

/// Relative tolerance of the Maxwell-Betti symmetry invariant.
const SYMMETRY_RTOL: f64 = 1e-8;

pub struct FlexibilityOutput {
    pub f: Mat,
    pub e0: DVec,
    pub eh: DVec,
}

pub(crate) struct BarStiffness {
    pub ei: f64,
    pub ea: f64,
    pub gas: f64,
}

pub(crate) fn bar_stiffness(model: &FrameModel, bar: u32) -> FrameResult<BarStiffness> {
    let material = model.bar_material(bar)?;
    let section = model.bar_section(bar)?;
    Ok(BarStiffness {
        ei: material.e * section.iz,
        ea: material.e * section.a,
        gas: material.shear_modulus() * section.kappa * section.a,
    })
}

/// Virtual-work product of two fields over one bar.
pub(crate) fn product_integral(
    options: &AnalysisOptions,
    bar: u32,
    a: &ForceField,
    b: &ForceField,
    k: &BarStiffness,
) -> FrameResult<f64> {
    let breaks = merge_breaks(&a.breakpoints(), &b.breakpoints(), 1e-9);
    let mut total = 0.0;
    for pair in breaks.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        if x1 - x0 < 1e-12 {
            continue;
        }
        let mid = 0.5 * (x0 + x1);
        let sa = a.segment_at(mid);
        let sb = b.segment_at(mid);

        let mut terms: Vec<(&crate::math::Poly, &crate::math::Poly, f64)> =
            vec![(&sa.m, &sb.m, k.ei)];
        if options.include_axial {
            terms.push((&sa.n, &sb.n, k.ea));
        }
        if options.include_shear {
            terms.push((&sa.v, &sb.v, k.gas));
        }
        for (pa, pb, stiffness) in terms {
            if pa.is_zero() || pb.is_zero() {
                continue;
            }
            let exact = pa.degree() + pb.degree() <= 3;
            let value = math::simpson_adaptive(
                |x| pa.eval(x) * pb.eval(x) / stiffness,
                x0,
                x1,
                options.simpson_points,
                exact,
            )
            .ok_or(FrameError::IntegrationFailure { bar })?;
            total += value;
        }
    }
    Ok(total)
}

/// Plain integral of one diagram over the whole bar (thermal terms).
pub(crate) fn field_integral<F>(
    options: &AnalysisOptions,
    bar: u32,
    field: &ForceField,
    select: F,
) -> FrameResult<f64>
where
    F: Fn(&crate::field::SegmentField) -> &crate::math::Poly,
{
    let breaks = field.breakpoints();
    let mut total = 0.0;
    for pair in breaks.windows(2) {
        let (x0, x1) = (pair[0], pair[1]);
        if x1 - x0 < 1e-12 {
            continue;
        }
        let seg = field.segment_at(0.5 * (x0 + x1));
        let poly = select(seg);
        if poly.is_zero() {
            continue;
        }
        let value = math::simpson_adaptive(
            |x| poly.eval(x),
            x0,
            x1,
            options.simpson_points,
            poly.degree() <= 3,
        )
        .ok_or(FrameError::IntegrationFailure { bar })?;
        total += value;
    }
    Ok(total)
}

/// Assemble F, e0 and eh for the chosen redundants.
pub fn assemble(
    ctx: &StaticsContext<'_>,
    options: &AnalysisOptions,
    primary: &Substructure,
    units: &[Substructure],
    redundants: &[Redundant],
) -> FrameResult<FlexibilityOutput> {
    let model = ctx.model;
    let n = units.len();
    let mut f = Mat::zeros(n, n);
    let mut e0 = DVec::zeros(n);
    let mut eh = DVec::zeros(n);

    let bar_ids: Vec<u32> = model.bars.keys().copied().collect();

    // every (i, j) entry is integrated independently so the symmetry
    // check below exercises the statics, not the mirroring
    for i in 0..n {
        for j in 0..n {
            let mut value = 0.0;
            for &bar in &bar_ids {
                let k = bar_stiffness(model, bar)?;
                let fa = units[i].field(bar).ok_or_else(|| FrameError::InternalFault(
                    format!("missing field for bar {bar} in {}", units[i].name),
                ))?;
                let fb = units[j].field(bar).ok_or_else(|| FrameError::InternalFault(
                    format!("missing field for bar {bar} in {}", units[j].name),
                ))?;
                value += product_integral(options, bar, fa, fb, &k)?;
            }
            f[(i, j)] = value;
        }
    }

    for i in 0..n {
        let mut value = 0.0;
        for &bar in &bar_ids {
            let k = bar_stiffness(model, bar)?;
            let fa = units[i].field(bar).ok_or_else(|| FrameError::InternalFault(
                format!("missing field for bar {bar} in {}", units[i].name),
            ))?;
            let fb = primary.field(bar).ok_or_else(|| FrameError::InternalFault(
                format!("missing primary field for bar {bar}"),
            ))?;
            value += product_integral(options, bar, fa, fb, &k)?;
        }
        e0[i] = value;
    }

    // thermal strains against the unit diagrams
    for load in &model.loads {
        let Load::Thermal(thermal) = load else {
            continue;
        };
        let material = model.bar_material(thermal.bar)?;
        let section = model.bar_section(thermal.bar)?;
        for i in 0..n {
            let field = units[i].field(thermal.bar).ok_or_else(|| {
                FrameError::InternalFault(format!(
                    "missing field for bar {} in {}",
                    thermal.bar, units[i].name
                ))
            })?;
            if thermal.has_uniform() {
                let n_int = field_integral(options, thermal.bar, field, |s| &s.n)?;
                e0[i] += material.alpha * thermal.dt_uniform * n_int;
            }
            if thermal.has_gradient() {
                let h = section.h.unwrap_or(0.0);
                let m_int = field_integral(options, thermal.bar, field, |s| &s.m)?;
                e0[i] += material.alpha * thermal.dt_gradient / h * m_int;
            }
        }
    }

    // support movements: eh on redundant directions, -R*delta elsewhere
    for load in &model.loads {
        let Load::ImposedDisplacement(imposed) = load else {
            continue;
        };
        let components = [
            (crate::elements::Dof::Ux, imposed.dx),
            (crate::elements::Dof::Uy, imposed.dy),
            (crate::elements::Dof::Rz, imposed.dtheta),
        ];
        for (dof, delta) in components {
            if delta.abs() < 1e-15 {
                continue;
            }
            for (i, redundant) in redundants.iter().enumerate() {
                if redundant.reaction_target() == Some((imposed.joint, dof)) {
                    eh[i] += delta;
                }
            }
            let retained = primary
                .supports
                .get(&imposed.joint)
                .is_some_and(|dofs| dofs.contains(&dof));
            if retained {
                for i in 0..n {
                    e0[i] -= units[i].reaction_component(imposed.joint, dof) * delta;
                }
            }
        }
    }

    // spring compliance: released springs on the diagonal, springs kept
    // in the primary through the virtual work of their reactions
    for (i, redundant) in redundants.iter().enumerate() {
        if let Some((joint, dof)) = redundant.reaction_target() {
            if let Some(stiffness) = model
                .supports
                .get(&joint)
                .and_then(|s| s.spring_stiffness(dof))
            {
                f[(i, i)] += 1.0 / stiffness;
            }
        }
    }
    for (&joint, support) in &model.supports {
        for dof in support.restrained_dofs() {
            let Some(stiffness) = support.spring_stiffness(dof) else {
                continue;
            };
            let released = redundants
                .iter()
                .any(|r| r.reaction_target() == Some((joint, dof)));
            if released {
                continue;
            }
            let r0 = primary.reaction_component(joint, dof);
            for i in 0..n {
                let ri = units[i].reaction_component(joint, dof);
                e0[i] += ri * r0 / stiffness;
                for j in 0..n {
                    let rj = units[j].reaction_component(joint, dof);
                    f[(i, j)] += ri * rj / stiffness;
                }
            }
        }
    }

    check_symmetry(&f)?;
    Ok(FlexibilityOutput { f, e0, eh })
}

/// Maxwell-Betti reciprocity: F must be symmetric to round-off.
fn check_symmetry(f: &Mat) -> FrameResult<()> {
    if f.nrows() == 0 {
        return Ok(());
    }
    let norm = inf_norm(f);
    if norm == 0.0 {
        return Ok(());
    }
    let deviation = inf_norm(&(f - f.transpose())) / norm;
    if deviation >= SYMMETRY_RTOL {
        warn!("flexibility matrix asymmetry {deviation:.3e} exceeds tolerance");
        return Err(FrameError::AsymmetricFlexibility { deviation });
    }
    Ok(())
}

fn inf_norm(m: &Mat) -> f64 {
    (0..m.nrows())
        .map(|r| (0..m.ncols()).map(|c| m[(r, c)].abs()).sum::<f64>())
        .fold(0.0, f64::max)
}
