//! Redundant constraints and their automatic selection.
//!
//! The selector walks candidates in a deterministic priority order and
//! backtracks whenever a tentative set leaves an unstable or statically
//! over- or under-determined primary structure.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::{Dof, Support};
use crate::error::{FrameError, FrameResult};
use crate::model::FrameModel;

/// A constraint chosen for release; its unknown value is recovered from
/// the compatibility system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Redundant {
    /// Horizontal support reaction
    ReactionX { joint: u32 },
    /// Vertical support reaction
    ReactionY { joint: u32 },
    /// Support reaction moment
    ReactionMoment { joint: u32 },
    /// Reaction of an elastic support in one of its sprung directions
    SpringReaction { joint: u32, dof: Dof },
    /// Internal bending moment at a bar abscissa
    InternalMoment { bar: u32, x: f64 },
    /// Internal shear force at a bar abscissa
    InternalShear { bar: u32, x: f64 },
    /// Internal axial force at a bar abscissa
    InternalAxial { bar: u32, x: f64 },
}

impl Redundant {
    /// Joint and released direction, for reaction-kind redundants.
    pub fn reaction_target(&self) -> Option<(u32, Dof)> {
        match *self {
            Redundant::ReactionX { joint } => Some((joint, Dof::Ux)),
            Redundant::ReactionY { joint } => Some((joint, Dof::Uy)),
            Redundant::ReactionMoment { joint } => Some((joint, Dof::Rz)),
            Redundant::SpringReaction { joint, dof } => Some((joint, dof)),
            _ => None,
        }
    }

    /// Bar site, for internal-release redundants.
    pub fn internal_site(&self) -> Option<(u32, f64)> {
        match *self {
            Redundant::InternalMoment { bar, x }
            | Redundant::InternalShear { bar, x }
            | Redundant::InternalAxial { bar, x } => Some((bar, x)),
            _ => None,
        }
    }
}

impl fmt::Display for Redundant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Redundant::ReactionX { joint } => write!(f, "Rx at joint {joint}"),
            Redundant::ReactionY { joint } => write!(f, "Ry at joint {joint}"),
            Redundant::ReactionMoment { joint } => write!(f, "Mz at joint {joint}"),
            Redundant::SpringReaction { joint, dof } => {
                write!(f, "spring reaction {dof:?} at joint {joint}")
            }
            Redundant::InternalMoment { bar, x } => {
                write!(f, "internal moment in bar {bar} at x = {x:.3} m")
            }
            Redundant::InternalShear { bar, x } => {
                write!(f, "internal shear in bar {bar} at x = {x:.3} m")
            }
            Redundant::InternalAxial { bar, x } => {
                write!(f, "internal axial in bar {bar} at x = {x:.3} m")
            }
        }
    }
}

/// Candidate priority: lower runs first. Spring directions must become
/// redundants whenever possible so their compliance enters F; support
/// moments at fixed joints give the best-conditioned systems; internal
/// releases are a last resort.
fn priority(model: &FrameModel, r: &Redundant) -> u8 {
    match *r {
        Redundant::SpringReaction { .. } => 0,
        Redundant::ReactionMoment { joint } => {
            if matches!(model.supports.get(&joint), Some(Support::Fixed)) {
                1
            } else {
                4
            }
        }
        Redundant::ReactionY { .. } => 2,
        Redundant::ReactionX { .. } => 3,
        Redundant::InternalMoment { .. } => 5,
        Redundant::InternalShear { .. } | Redundant::InternalAxial { .. } => 6,
    }
}

fn kind_order(r: &Redundant) -> u8 {
    match r {
        Redundant::ReactionMoment { .. } => 0,
        Redundant::ReactionY { .. } => 1,
        Redundant::ReactionX { .. } => 2,
        Redundant::SpringReaction { .. } => 3,
        Redundant::InternalMoment { .. } => 4,
        Redundant::InternalShear { .. } => 5,
        Redundant::InternalAxial { .. } => 6,
    }
}

/// All candidate redundants, sorted by priority then ascending id.
pub fn candidates(model: &FrameModel) -> Vec<Redundant> {
    let mut list: Vec<Redundant> = Vec::new();

    for (&joint, support) in &model.supports {
        for dof in support.restrained_dofs() {
            let candidate = if support.spring_stiffness(dof).is_some() {
                Redundant::SpringReaction { joint, dof }
            } else {
                match dof {
                    Dof::Ux => Redundant::ReactionX { joint },
                    Dof::Uy => Redundant::ReactionY { joint },
                    Dof::Rz => Redundant::ReactionMoment { joint },
                }
            };
            list.push(candidate);
        }
    }

    // Midspan moment releases on the longest bars, as a last resort.
    let mut by_length: Vec<(u32, f64)> = model
        .bars
        .keys()
        .filter_map(|&id| model.bar_geometry(id).ok().map(|g| (id, g.l)))
        .collect();
    by_length.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(a.0.cmp(&b.0)));
    for (bar, l) in by_length {
        list.push(Redundant::InternalMoment { bar, x: l / 2.0 });
    }

    list.sort_by(|a, b| {
        let pa = priority(model, a);
        let pb = priority(model, b);
        pa.cmp(&pb)
            .then_with(|| {
                let ia = a.reaction_target().map(|(j, _)| j).or_else(|| a.internal_site().map(|(b, _)| b));
                let ib = b.reaction_target().map(|(j, _)| j).or_else(|| b.internal_site().map(|(b_, _)| b_));
                ia.cmp(&ib)
            })
            .then_with(|| kind_order(a).cmp(&kind_order(b)))
    });
    list
}

/// Joint-level guard used during the backtracking search: never strip a
/// rigidly supported joint of every restraint (releasing all directions of
/// an elastic support is fine, that is the point of spring redundants).
fn strips_rigid_joint(model: &FrameModel, chosen: &[Redundant], candidate: &Redundant) -> bool {
    let Some((joint, _)) = candidate.reaction_target() else {
        return false;
    };
    let Some(support) = model.supports.get(&joint) else {
        return true;
    };
    if support.is_elastic() {
        return false;
    }
    let total = support.restraint_count();
    let released = chosen
        .iter()
        .chain(std::iter::once(candidate))
        .filter(|r| r.reaction_target().map(|(j, _)| j) == Some(joint))
        .count();
    released >= total
}

/// Validate a user-provided redundant against the model.
pub fn validate_redundant(model: &FrameModel, r: &Redundant) -> FrameResult<()> {
    if let Some((joint, dof)) = r.reaction_target() {
        let support = model
            .supports
            .get(&joint)
            .ok_or_else(|| FrameError::RedundantSelection(format!("joint {joint} has no support")))?;
        if !support.restrains(dof) {
            return Err(FrameError::RedundantSelection(format!(
                "support at joint {joint} does not restrain {dof:?}"
            )));
        }
        if matches!(r, Redundant::SpringReaction { .. }) && support.spring_stiffness(dof).is_none()
        {
            return Err(FrameError::RedundantSelection(format!(
                "joint {joint} has no spring stiffness in {dof:?}"
            )));
        }
    }
    if let Some((bar, x)) = r.internal_site() {
        let geometry = model
            .bar_geometry(bar)
            .map_err(|_| FrameError::RedundantSelection(format!("bar {bar} does not exist")))?;
        if !(0.0..=geometry.l).contains(&x) {
            return Err(FrameError::RedundantSelection(format!(
                "release abscissa {x} outside bar {bar} (length {})",
                geometry.l
            )));
        }
    }
    Ok(())
}

/// Select `gh` redundants automatically. `admissible` judges a complete
/// candidate set (square, full-rank, well-conditioned primary).
pub fn select<F>(model: &FrameModel, gh: usize, admissible: F) -> FrameResult<Vec<Redundant>>
where
    F: Fn(&[Redundant]) -> bool,
{
    let pool = candidates(model);
    let mut chosen: Vec<Redundant> = Vec::with_capacity(gh);

    fn search<F>(
        model: &FrameModel,
        pool: &[Redundant],
        start: usize,
        gh: usize,
        chosen: &mut Vec<Redundant>,
        admissible: &F,
    ) -> bool
    where
        F: Fn(&[Redundant]) -> bool,
    {
        if chosen.len() == gh {
            return admissible(chosen);
        }
        for idx in start..pool.len() {
            let candidate = pool[idx];
            if chosen.contains(&candidate) {
                continue;
            }
            if strips_rigid_joint(model, chosen, &candidate) {
                continue;
            }
            chosen.push(candidate);
            if search(model, pool, idx + 1, gh, chosen, admissible) {
                return true;
            }
            chosen.pop();
        }
        false
    }

    if search(model, &pool, 0, gh, &mut chosen, &admissible) {
        for (k, r) in chosen.iter().enumerate() {
            debug!("redundant X{} = {}", k + 1, r);
        }
        Ok(chosen)
    } else {
        Err(FrameError::RedundantSelection(format!(
            "no admissible set of {gh} redundants among {} candidates",
            pool.len()
        )))
    }
}
