//! Isostatic statics: support reactions by global equilibrium and
//! internal force fields by the method of sections.
//!
//! Reactions come from the square system `A·R = b` whose rows are the
//! three global equilibrium equations about the origin plus one condition
//! row per internal release. Fields are then built bar by bar from the
//! connected component on the i side of each section, which handles
//! cantilever bars the same way as everything else: a free end simply
//! contributes no reactions.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::analysis::substructure::{CaseLoads, ReleaseKind, ReleaseSite, Substructure, SupportMap};
use crate::elements::{BarGeometry, Dof};
use crate::error::{FrameError, FrameResult};
use crate::field::{ForceField, SegmentField};
use crate::loads::DistributedLoad;
use crate::math::{self, moment_about, Mat, Poly, Vec as DVec};
use crate::model::FrameModel;

/// Condition number of the reaction system beyond which the substructure
/// geometry is declared defective.
const REACTION_COND_LIMIT: f64 = 1e12;

/// Absolute tolerance (scaled by the load magnitude) of the end-boundary
/// cross-check.
const END_CHECK_TOL: f64 = 1e-6;

const EVENT_TOL: f64 = 1e-9;

/// Joints and whole bars on one side of a cut.
#[derive(Debug, Clone, Default)]
pub struct Component {
    pub joints: BTreeSet<u32>,
    pub bars: BTreeSet<u32>,
}

/// Precomputed geometry and connectivity shared by every substructure
/// solve of one analysis.
pub struct StaticsContext<'m> {
    pub model: &'m FrameModel,
    pub geometry: BTreeMap<u32, BarGeometry>,
    adjacency: BTreeMap<u32, Vec<(u32, u32)>>,
}

impl<'m> StaticsContext<'m> {
    pub fn new(model: &'m FrameModel) -> FrameResult<Self> {
        let mut geometry = BTreeMap::new();
        let mut adjacency: BTreeMap<u32, Vec<(u32, u32)>> = BTreeMap::new();
        for &joint in model.joints.keys() {
            adjacency.entry(joint).or_default();
        }
        for (&id, bar) in &model.bars {
            geometry.insert(id, model.bar_geometry(id)?);
            adjacency
                .entry(bar.i_joint)
                .or_default()
                .push((id, bar.j_joint));
            adjacency
                .entry(bar.j_joint)
                .or_default()
                .push((id, bar.i_joint));
        }
        Ok(Self {
            model,
            geometry,
            adjacency,
        })
    }

    /// Connected component reachable from `start` without traversing
    /// `excluded_bar`.
    pub fn component_without(&self, excluded_bar: u32, start: u32) -> Component {
        let mut component = Component::default();
        let mut queue = VecDeque::from([start]);
        component.joints.insert(start);
        while let Some(joint) = queue.pop_front() {
            if let Some(edges) = self.adjacency.get(&joint) {
                for &(bar, other) in edges {
                    if bar == excluded_bar {
                        continue;
                    }
                    component.bars.insert(bar);
                    if component.joints.insert(other) {
                        queue.push_back(other);
                    }
                }
            }
        }
        component
    }

    /// The model must form one connected piece for the three global
    /// equilibrium rows to close the system.
    pub fn check_connected(&self) -> FrameResult<()> {
        let Some(&first) = self.model.joints.keys().next() else {
            return Ok(());
        };
        // u32::MAX never matches a bar id, so nothing is excluded.
        let component = self.component_without(u32::MAX, first);
        if component.joints.len() != self.model.joints.len() {
            return Err(FrameError::InvalidGeometry(
                "model is not a single connected structure".to_string(),
            ));
        }
        Ok(())
    }

    fn unknowns(&self, supports: &SupportMap) -> Vec<(u32, Dof)> {
        let mut list = Vec::new();
        for (&joint, dofs) in supports {
            for &dof in dofs {
                list.push((joint, dof));
            }
        }
        list
    }

    /// j side of a cut on `bar` (used by release rows): the component
    /// reached from the j joint plus the bar stretch beyond the cut.
    fn far_side(&self, site: &ReleaseSite) -> FrameResult<Component> {
        let bar = self.model.bar(site.bar)?;
        let component = self.component_without(site.bar, bar.j_joint);
        if component.joints.contains(&bar.i_joint) {
            return Err(FrameError::Unstable(format!(
                "bar {} belongs to a closed circuit; the release at x = {:.3} cannot isolate a side",
                site.bar, site.x
            )));
        }
        Ok(component)
    }

    /// Coefficient matrix of the reaction system and the unknown layout.
    pub fn reaction_matrix(
        &self,
        supports: &SupportMap,
        releases: &[ReleaseSite],
    ) -> FrameResult<(Mat, Vec<(u32, Dof)>)> {
        let unknowns = self.unknowns(supports);
        let rows = 3 + releases.len();
        if rows != unknowns.len() {
            return Err(FrameError::Unstable(format!(
                "reaction system is not square: {} unknowns vs {} equilibrium rows",
                unknowns.len(),
                rows
            )));
        }
        let mut a = Mat::zeros(rows, rows);
        for (col, &(joint, dof)) in unknowns.iter().enumerate() {
            let jt = self.model.joint(joint)?;
            match dof {
                Dof::Ux => {
                    a[(0, col)] = 1.0;
                    a[(2, col)] = moment_about(1.0, 0.0, jt.x, jt.y, 0.0, 0.0);
                }
                Dof::Uy => {
                    a[(1, col)] = 1.0;
                    a[(2, col)] = moment_about(0.0, 1.0, jt.x, jt.y, 0.0, 0.0);
                }
                Dof::Rz => {
                    a[(2, col)] = 1.0;
                }
            }
        }
        for (k, site) in releases.iter().enumerate() {
            let row = 3 + k;
            let geometry = self.geometry[&site.bar];
            let side = self.far_side(site)?;
            let pivot = geometry.point_at(site.x);
            for (col, &(joint, dof)) in unknowns.iter().enumerate() {
                if !side.joints.contains(&joint) {
                    continue;
                }
                let jt = self.model.joint(joint)?;
                a[(row, col)] = match site.kind {
                    ReleaseKind::Moment => match dof {
                        Dof::Ux => moment_about(1.0, 0.0, jt.x, jt.y, pivot.0, pivot.1),
                        Dof::Uy => moment_about(0.0, 1.0, jt.x, jt.y, pivot.0, pivot.1),
                        Dof::Rz => 1.0,
                    },
                    ReleaseKind::Shear => match dof {
                        Dof::Ux => geometry.normal.0,
                        Dof::Uy => geometry.normal.1,
                        Dof::Rz => 0.0,
                    },
                    ReleaseKind::Axial => match dof {
                        Dof::Ux => geometry.axis.0,
                        Dof::Uy => geometry.axis.1,
                        Dof::Rz => 0.0,
                    },
                };
            }
        }
        Ok((a, unknowns))
    }

    /// Global force and moment (about `pivot`) of the loads carried by a
    /// component, optionally extended with the stretch of `cut` bar
    /// beyond the cut abscissa and the pair face acting on that side.
    fn side_load_sums(
        &self,
        loads: &CaseLoads,
        component: &Component,
        cut: Option<&ReleaseSite>,
        pivot: (f64, f64),
    ) -> (f64, f64, f64) {
        let (mut fx, mut fy, mut m) = (0.0, 0.0, 0.0);
        for l in &loads.joint {
            if component.joints.contains(&l.joint) {
                let jt = &self.model.joints[&l.joint];
                fx += l.fx;
                fy += l.fy;
                m += moment_about(l.fx, l.fy, jt.x, jt.y, pivot.0, pivot.1) + l.mz;
            }
        }
        for l in &loads.bar_point {
            let on_component = component.bars.contains(&l.bar);
            let on_stretch = cut.is_some_and(|c| c.bar == l.bar && l.a > c.x + EVENT_TOL);
            if on_component || on_stretch {
                let geometry = self.geometry[&l.bar];
                let (px, py) = l.global_components(&geometry);
                let at = geometry.point_at(l.a);
                fx += px;
                fy += py;
                m += moment_about(px, py, at.0, at.1, pivot.0, pivot.1);
            }
        }
        for l in &loads.bar_dist {
            let geometry = self.geometry[&l.bar];
            let (lo, hi) = if component.bars.contains(&l.bar) {
                (l.x1, l.end(geometry.l))
            } else if let Some(c) = cut.filter(|c| c.bar == l.bar) {
                let lo = l.x1.max(c.x);
                let hi = l.end(geometry.l);
                if hi <= lo + EVENT_TOL {
                    continue;
                }
                (lo, hi)
            } else {
                continue;
            };
            let (r, xc) = clipped_resultant(l, &geometry, lo, hi);
            let (dx, dy) = geometry.load_direction(l.angle);
            let at = geometry.point_at(xc);
            fx += r * dx;
            fy += r * dy;
            m += moment_about(r * dx, r * dy, at.0, at.1, pivot.0, pivot.1);
        }
        if let Some(c) = cut {
            for pair in &loads.pairs {
                if pair.bar == c.bar && (pair.x - c.x).abs() < EVENT_TOL && pair.kind == c.kind {
                    // face of the unit pair acting on the j side
                    let geometry = self.geometry[&c.bar];
                    match c.kind {
                        ReleaseKind::Moment => m -= 1.0,
                        ReleaseKind::Shear => {
                            fx -= geometry.normal.0;
                            fy -= geometry.normal.1;
                        }
                        ReleaseKind::Axial => {
                            fx -= geometry.axis.0;
                            fy -= geometry.axis.1;
                        }
                    }
                }
            }
        }
        (fx, fy, m)
    }

    fn reaction_rhs(
        &self,
        loads: &CaseLoads,
        releases: &[ReleaseSite],
    ) -> FrameResult<DVec> {
        let rows = 3 + releases.len();
        let mut b = DVec::zeros(rows);
        let everything = Component {
            joints: self.model.joints.keys().copied().collect(),
            bars: self.model.bars.keys().copied().collect(),
        };
        let (fx, fy, m) = self.side_load_sums(loads, &everything, None, (0.0, 0.0));
        b[0] = -fx;
        b[1] = -fy;
        b[2] = -m;
        for (k, site) in releases.iter().enumerate() {
            let geometry = self.geometry[&site.bar];
            let side = self.far_side(site)?;
            let pivot = geometry.point_at(site.x);
            let (sfx, sfy, sm) = self.side_load_sums(loads, &side, Some(site), pivot);
            b[3 + k] = match site.kind {
                ReleaseKind::Moment => -sm,
                ReleaseKind::Shear => -(sfx * geometry.normal.0 + sfy * geometry.normal.1),
                ReleaseKind::Axial => -(sfx * geometry.axis.0 + sfy * geometry.axis.1),
            };
        }
        Ok(b)
    }

    /// Solve one substructure: reactions, then the field of every bar,
    /// then the end-boundary cross-check.
    pub fn solve_case(&self, sub: &mut Substructure) -> FrameResult<()> {
        let (a, unknowns) = self.reaction_matrix(&sub.supports, &sub.releases)?;
        let cond = math::condition_number(&a);
        if cond > REACTION_COND_LIMIT {
            return Err(FrameError::Unstable(format!(
                "reaction system of '{}' is numerically singular (cond = {cond:.3e})",
                sub.name
            )));
        }
        let b = self.reaction_rhs(&sub.loads, &sub.releases)?;
        let solved = math::solve_lu(&a, &b).ok_or_else(|| FrameError::Singular {
            context: format!("reaction system of '{}'", sub.name),
        })?;

        sub.reactions.clear();
        for (k, &(joint, dof)) in unknowns.iter().enumerate() {
            let entry = sub.reactions.entry(joint).or_default();
            match dof {
                Dof::Ux => entry.fx = solved[k],
                Dof::Uy => entry.fy = solved[k],
                Dof::Rz => entry.mz = solved[k],
            }
        }

        sub.fields.clear();
        for &bar in self.model.bars.keys() {
            let field = self.build_field(sub, bar)?;
            self.check_bar_end(sub, bar, &field)?;
            sub.fields.insert(bar, field);
        }
        Ok(())
    }

    /// Internal force field of one bar by the method of sections, as
    /// exact piecewise polynomials between load events.
    fn build_field(&self, sub: &Substructure, bar_id: u32) -> FrameResult<ForceField> {
        let bar = self.model.bar(bar_id)?;
        let geometry = self.geometry[&bar_id];
        let component = self.component_without(bar_id, bar.i_joint);
        if component.joints.contains(&bar.j_joint) {
            return Err(FrameError::Unstable(format!(
                "bar {bar_id} belongs to a closed circuit and cannot be sectioned"
            )));
        }

        // Resultant of everything on the i side, reduced at the i end.
        let origin = geometry.origin;
        let (mut f0x, mut f0y, mut m0) =
            self.side_load_sums(&sub.loads, &component, None, origin);
        for &joint in &component.joints {
            if let Some(r) = sub.reactions.get(&joint) {
                let jt = &self.model.joints[&joint];
                f0x += r.fx;
                f0y += r.fy;
                m0 += moment_about(r.fx, r.fy, jt.x, jt.y, origin.0, origin.1) + r.mz;
            }
        }

        let mut events = vec![0.0, geometry.l];
        for l in &sub.loads.bar_point {
            if l.bar == bar_id && l.a > EVENT_TOL && l.a < geometry.l - EVENT_TOL {
                events.push(l.a);
            }
        }
        for l in &sub.loads.bar_dist {
            if l.bar == bar_id {
                for x in [l.x1, l.end(geometry.l)] {
                    if x > EVENT_TOL && x < geometry.l - EVENT_TOL {
                        events.push(x);
                    }
                }
            }
        }
        events.sort_by(|p, q| p.partial_cmp(q).expect("finite events"));
        events.dedup_by(|p, q| (*p - *q).abs() < EVENT_TOL);

        let (sin, cos) = (geometry.axis.1, geometry.axis.0);
        let mut segments = Vec::with_capacity(events.len() - 1);
        for pair in events.windows(2) {
            let (x0, x1) = (pair[0], pair[1]);
            let mid = 0.5 * (x0 + x1);

            let mut fx = Poly::constant(f0x);
            let mut fy = Poly::constant(f0y);
            let mut m = Poly::linear(m0, f0x * sin - f0y * cos);

            for l in &sub.loads.bar_point {
                if l.bar != bar_id || l.a >= mid {
                    continue;
                }
                let (px, py) = l.global_components(&geometry);
                fx = fx.add(&Poly::constant(px));
                fy = fy.add(&Poly::constant(py));
                let lever = px * sin - py * cos;
                m = m.add(&Poly::linear(-l.a * lever, lever));
            }
            for l in &sub.loads.bar_dist {
                if l.bar != bar_id {
                    continue;
                }
                let lo = l.x1;
                let hi = l.end(geometry.l);
                if mid <= lo {
                    continue;
                }
                let (dx, dy) = geometry.load_direction(l.angle);
                let lever = dx * sin - dy * cos;
                if mid >= hi {
                    // fully passed: constant resultant at its centroid
                    let (r, xc) = clipped_resultant(l, &geometry, lo, hi);
                    fx = fx.add(&Poly::constant(r * dx));
                    fy = fy.add(&Poly::constant(r * dy));
                    m = m.add(&Poly::linear(-xc * r * lever, r * lever));
                } else {
                    // active stretch: Q(x) = q1*u + k*u^2/2, u = x - lo
                    let span = hi - lo;
                    let k = if span > EVENT_TOL {
                        (l.q2 - l.q1) / span
                    } else {
                        0.0
                    };
                    let u = Poly::linear(-lo, 1.0);
                    let u2 = u.mul(&u);
                    let u3 = u2.mul(&u);
                    let q = u.scale(l.q1).add(&u2.scale(k / 2.0));
                    fx = fx.add(&q.scale(dx));
                    fy = fy.add(&q.scale(dy));
                    // moment of the stretch about the moving section:
                    // I1(u) = q1*u^2/2 + k*u^3/6
                    let i1 = u2.scale(l.q1 / 2.0).add(&u3.scale(k / 6.0));
                    m = m.add(&i1.scale(lever));
                }
            }

            let n = fx.scale(-cos).add(&fy.scale(-sin));
            let v = fx
                .scale(geometry.normal.0)
                .add(&fy.scale(geometry.normal.1));
            segments.push(SegmentField { x0, x1, n, v, m });
        }

        Ok(ForceField {
            bar: bar_id,
            length: geometry.l,
            segments,
        })
    }

    /// Cross-check: the field at x = L must match the resultant of the
    /// j side. A mismatch indicates a statics bug, not a bad model.
    fn check_bar_end(&self, sub: &Substructure, bar_id: u32, field: &ForceField) -> FrameResult<()> {
        let bar = self.model.bar(bar_id)?;
        let geometry = self.geometry[&bar_id];
        let component = self.component_without(bar_id, bar.j_joint);
        let pivot = geometry.point_at(geometry.l);
        let (mut fx, mut fy, mut m) = self.side_load_sums(&sub.loads, &component, None, pivot);
        // point loads sitting exactly on the j end belong to the j side
        for l in &sub.loads.bar_point {
            if l.bar == bar_id && l.a >= geometry.l - EVENT_TOL {
                let (px, py) = l.global_components(&geometry);
                fx += px;
                fy += py;
            }
        }
        for &joint in &component.joints {
            if let Some(r) = sub.reactions.get(&joint) {
                let jt = &self.model.joints[&joint];
                fx += r.fx;
                fy += r.fy;
                m += moment_about(r.fx, r.fy, jt.x, jt.y, pivot.0, pivot.1) + r.mz;
            }
        }
        let n_expected = fx * geometry.axis.0 + fy * geometry.axis.1;
        let v_expected = -(fx * geometry.normal.0 + fy * geometry.normal.1);
        let m_expected = -m;

        let n_end = field.n(geometry.l);
        let v_end = field.v(geometry.l);
        let m_end = field.m(geometry.l);
        let scale = [n_end, v_end, m_end, n_expected, v_expected, m_expected]
            .iter()
            .fold(1.0_f64, |acc, q| acc.max(q.abs()));
        let tol = END_CHECK_TOL * scale;
        if (n_end - n_expected).abs() > tol
            || (v_end - v_expected).abs() > tol
            || (m_end - m_expected).abs() > tol
        {
            return Err(FrameError::InternalFault(format!(
                "bar {bar_id} end actions disagree with the j-side resultant in '{}' \
                 (dN = {:.3e}, dV = {:.3e}, dM = {:.3e})",
                sub.name,
                n_end - n_expected,
                v_end - v_expected,
                m_end - m_expected,
            )));
        }
        Ok(())
    }

    /// External load resultants for the final equilibrium verification.
    pub fn external_sums(&self, loads: &CaseLoads) -> (f64, f64, f64) {
        let everything = Component {
            joints: self.model.joints.keys().copied().collect(),
            bars: self.model.bars.keys().copied().collect(),
        };
        self.side_load_sums(loads, &everything, None, (0.0, 0.0))
    }
}

/// Resultant and centroid abscissa of the stretch `[lo, hi]` of a
/// distributed load.
fn clipped_resultant(
    load: &DistributedLoad,
    geometry: &BarGeometry,
    lo: f64,
    hi: f64,
) -> (f64, f64) {
    let w_lo = load.intensity_at(lo, geometry.l);
    let w_hi = load.intensity_at(hi, geometry.l);
    let span = hi - lo;
    let r = (w_lo + w_hi) / 2.0 * span;
    let sum = w_lo + w_hi;
    let xc = if span < EVENT_TOL || sum.abs() < 1e-12 {
        lo + span / 2.0
    } else {
        lo + span * (w_lo + 2.0 * w_hi) / (3.0 * sum)
    };
    (r, xc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::substructure::{CaseLoads, Substructure};
    use crate::elements::{Bar, Joint, Material, Section, Support};
    use crate::loads::{BarPointLoad, DistributedLoad, JointLoad};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn simple_beam(supports: &[(u32, Support)]) -> FrameModel {
        let mut model = FrameModel::new("beam");
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
        model.add_material("steel", Material::steel()).unwrap();
        model
            .add_section("ipe", Section::new(28.5e-4, 2.772e-5))
            .unwrap();
        model.add_bar(1, Bar::new(1, 2, "steel", "ipe")).unwrap();
        for (joint, support) in supports {
            model.set_support(*joint, *support).unwrap();
        }
        model
    }

    fn substructure_of(model: &FrameModel, loads: CaseLoads) -> Substructure {
        let supports = crate::analysis::substructure::primary_supports(model, &[]);
        let releases = crate::analysis::substructure::primary_releases(model, &[]).unwrap();
        Substructure {
            name: "test".to_string(),
            supports,
            releases,
            loads,
            reactions: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    #[test]
    fn simply_supported_beam_with_midspan_load() {
        let model = simple_beam(&[
            (1, Support::Pinned),
            (
                2,
                Support::Roller {
                    direction: crate::elements::RollerDirection::Y,
                },
            ),
        ]);
        let ctx = StaticsContext::new(&model).unwrap();
        let mut sub = substructure_of(
            &model,
            CaseLoads {
                bar_point: vec![BarPointLoad::transverse_down(1, 10.0, 3.0)],
                ..Default::default()
            },
        );
        ctx.solve_case(&mut sub).unwrap();

        assert_relative_eq!(sub.reaction(1).fy, 5.0, epsilon = 1e-9);
        assert_relative_eq!(sub.reaction(2).fy, 5.0, epsilon = 1e-9);

        let field = sub.field(1).unwrap();
        // sagging midspan moment is negative in this convention
        assert_relative_eq!(field.m(3.0), -15.0, epsilon = 1e-9);
        assert_relative_eq!(field.m(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(field.m(6.0), 0.0, epsilon = 1e-9);
        let (_, v_before, _) = field.values_before(3.0);
        assert_relative_eq!(v_before, 5.0, epsilon = 1e-9);
        assert_relative_eq!(field.v(3.0), -5.0, epsilon = 1e-9);
    }

    #[test]
    fn cantilever_fields_come_from_the_free_end() {
        let model = simple_beam(&[(1, Support::Fixed)]);
        let ctx = StaticsContext::new(&model).unwrap();
        let mut sub = substructure_of(
            &model,
            CaseLoads {
                joint: vec![JointLoad::vertical_down(2, 10.0)],
                ..Default::default()
            },
        );
        ctx.solve_case(&mut sub).unwrap();

        assert_relative_eq!(sub.reaction(1).fy, 10.0, epsilon = 1e-9);
        assert_relative_eq!(sub.reaction(1).mz, 60.0, epsilon = 1e-9);

        let field = sub.field(1).unwrap();
        assert_relative_eq!(field.m(0.0), 60.0, epsilon = 1e-9);
        assert_relative_eq!(field.m(6.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(field.v(2.0), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn uniform_load_gives_parabolic_moment() {
        let model = simple_beam(&[
            (1, Support::Pinned),
            (
                2,
                Support::Roller {
                    direction: crate::elements::RollerDirection::Y,
                },
            ),
        ]);
        let ctx = StaticsContext::new(&model).unwrap();
        let mut sub = substructure_of(
            &model,
            CaseLoads {
                bar_dist: vec![DistributedLoad::uniform_down(1, 10.0)],
                ..Default::default()
            },
        );
        ctx.solve_case(&mut sub).unwrap();

        assert_relative_eq!(sub.reaction(1).fy, 30.0, epsilon = 1e-9);
        let field = sub.field(1).unwrap();
        // |M_max| = q L^2 / 8 = 45 at midspan
        assert_relative_eq!(field.m(3.0), -45.0, epsilon = 1e-9);
        assert_relative_eq!(field.v(0.0), 30.0, epsilon = 1e-9);
        assert_relative_eq!(field.v(6.0), -30.0, epsilon = 1e-9);
        assert_relative_eq!(field.v(3.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn three_hinged_portal_reactions() {
        // pinned bases, moment hinge at the beam center
        let mut model = FrameModel::new("portal");
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(0.0, 4.0)).unwrap();
        model.add_joint(3, Joint::new(6.0, 4.0)).unwrap();
        model.add_joint(4, Joint::new(6.0, 0.0)).unwrap();
        model.add_material("steel", Material::steel()).unwrap();
        model
            .add_section("ipe", Section::new(28.5e-4, 2.772e-5))
            .unwrap();
        model.add_bar(1, Bar::new(1, 2, "steel", "ipe")).unwrap();
        model.add_bar(2, Bar::new(2, 3, "steel", "ipe")).unwrap();
        model.add_bar(3, Bar::new(3, 4, "steel", "ipe")).unwrap();
        model.set_support(1, Support::Pinned).unwrap();
        model.set_support(4, Support::Pinned).unwrap();

        let ctx = StaticsContext::new(&model).unwrap();
        let mut sub = substructure_of(
            &model,
            CaseLoads {
                bar_point: vec![BarPointLoad::transverse_down(2, 12.0, 3.0)],
                ..Default::default()
            },
        );
        sub.releases.push(ReleaseSite {
            bar: 2,
            x: 3.0,
            kind: ReleaseKind::Moment,
        });
        ctx.solve_case(&mut sub).unwrap();

        // symmetric: each base carries half the vertical load
        assert_relative_eq!(sub.reaction(1).fy, 6.0, epsilon = 1e-9);
        assert_relative_eq!(sub.reaction(4).fy, 6.0, epsilon = 1e-9);
        // thrust: H = M_ss / h = (12*6/4) / 4 = 4.5
        assert_relative_eq!(sub.reaction(1).fx.abs(), 4.5, epsilon = 1e-9);
        // moment vanishes at the crown hinge
        let field = sub.field(2).unwrap();
        assert_relative_eq!(field.m(3.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn closed_circuit_is_rejected() {
        let mut model = simple_beam(&[(1, Support::Fixed)]);
        // duplicate chord between the same joints forms a two-bar loop
        model.add_bar(2, Bar::new(1, 2, "steel", "ipe")).unwrap();
        let ctx = StaticsContext::new(&model).unwrap();
        let mut sub = substructure_of(&model, CaseLoads::default());
        let err = ctx.solve_case(&mut sub).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Unstable(_) | FrameError::InternalFault(_)
        ));
    }
}
