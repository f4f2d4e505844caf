//! Determinacy counting and the geometric stability check.
//!
//! The count `gh = r + 3b - 3n - releases` can be satisfied by a
//! mechanism (all restraints parallel, hinge chains), so a rank test of
//! the joint equilibrium matrix backs it up: three equilibrium rows per
//! joint over the bar end actions and reaction unknowns, plus one zero-
//! moment row per end hinge. Full row rank means every load case can be
//! equilibrated.

use crate::elements::Dof;
use crate::error::{FrameError, FrameResult};
use crate::math::{self, moment_about, Mat};
use crate::model::FrameModel;

/// Outcome of the determinacy count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determinacy {
    Isostatic,
    Hyperstatic(u32),
}

/// Classify the model, rejecting hypostatic counts outright.
pub fn classify(model: &FrameModel) -> FrameResult<Determinacy> {
    let gh = model.degree_of_indeterminacy();
    if gh < 0 {
        return Err(FrameError::Hypostatic { gh, deficit: -gh });
    }
    if gh == 0 {
        Ok(Determinacy::Isostatic)
    } else {
        Ok(Determinacy::Hyperstatic(gh as u32))
    }
}

/// Rank test of the joint equilibrium matrix. Unknown columns are the
/// three end actions of every bar at its i end plus one column per
/// restrained support direction; transfer to the j end follows from bar
/// equilibrium.
pub fn check_stability(model: &FrameModel) -> FrameResult<()> {
    let joints: Vec<u32> = model.joints.keys().copied().collect();
    let bars: Vec<u32> = model.bars.keys().copied().collect();
    let joint_row = |id: u32| 3 * joints.iter().position(|&j| j == id).expect("joint indexed");

    let hinge_rows: usize = model.bars.values().map(|b| b.release_count()).sum();
    let rows = 3 * joints.len() + hinge_rows;

    let mut reaction_cols: Vec<(u32, Dof)> = Vec::new();
    for (&joint, support) in &model.supports {
        for dof in support.restrained_dofs() {
            reaction_cols.push((joint, dof));
        }
    }
    let cols = 3 * bars.len() + reaction_cols.len();

    let mut a = Mat::zeros(rows, cols);
    let mut hinge_row = 3 * joints.len();

    for (bi, &bar_id) in bars.iter().enumerate() {
        let bar = model.bar(bar_id)?;
        let gi = model.joint(bar.i_joint)?;
        let gj = model.joint(bar.j_joint)?;
        let col = 3 * bi;
        let ri = joint_row(bar.i_joint);
        let rj = joint_row(bar.j_joint);

        // action of the bar on joint i: (Fx, Fy, M) directly
        a[(ri, col)] += 1.0;
        a[(ri + 1, col + 1)] += 1.0;
        a[(ri + 2, col + 2)] += 1.0;

        // transferred action on joint j: force negated, moment carried
        // over with the force lever arms
        let lever_fx = moment_about(1.0, 0.0, gi.x, gi.y, gj.x, gj.y);
        let lever_fy = moment_about(0.0, 1.0, gi.x, gi.y, gj.x, gj.y);
        a[(rj, col)] -= 1.0;
        a[(rj + 1, col + 1)] -= 1.0;
        a[(rj + 2, col)] -= lever_fx;
        a[(rj + 2, col + 1)] -= lever_fy;
        a[(rj + 2, col + 2)] -= 1.0;

        if bar.hinge_i {
            a[(hinge_row, col + 2)] = 1.0;
            hinge_row += 1;
        }
        if bar.hinge_j {
            // zero transmitted moment at the j end
            a[(hinge_row, col)] = lever_fx;
            a[(hinge_row, col + 1)] = lever_fy;
            a[(hinge_row, col + 2)] = 1.0;
            hinge_row += 1;
        }
    }

    for (k, &(joint, dof)) in reaction_cols.iter().enumerate() {
        let row = joint_row(joint);
        let col = 3 * bars.len() + k;
        match dof {
            Dof::Ux => a[(row, col)] = 1.0,
            Dof::Uy => a[(row + 1, col)] = 1.0,
            Dof::Rz => a[(row + 2, col)] = 1.0,
        }
    }

    let rank = math::numerical_rank(&a);
    if rank < rows {
        return Err(FrameError::Unstable(format!(
            "equilibrium matrix rank {rank} below the {rows} required; the restraint or \
             release pattern forms a mechanism"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Bar, Joint, Material, Section, RollerDirection, Support};

    fn base_model(n_spans: u32) -> FrameModel {
        let mut model = FrameModel::new("beam");
        model.add_material("steel", Material::steel()).unwrap();
        model
            .add_section("ipe", Section::new(28.5e-4, 2.772e-5))
            .unwrap();
        for j in 0..=n_spans {
            model.add_joint(j + 1, Joint::new(6.0 * j as f64, 0.0)).unwrap();
        }
        for b in 0..n_spans {
            model.add_bar(b + 1, Bar::new(b + 1, b + 2, "steel", "ipe")).unwrap();
        }
        model
    }

    #[test]
    fn classifies_by_count() {
        let mut model = base_model(1);
        model.set_support(1, Support::Fixed).unwrap();
        assert_eq!(classify(&model).unwrap(), Determinacy::Isostatic);
        model.set_support(2, Support::Fixed).unwrap();
        assert_eq!(classify(&model).unwrap(), Determinacy::Hyperstatic(3));
    }

    #[test]
    fn hypostatic_count_is_an_error() {
        let mut model = base_model(1);
        model
            .set_support(
                1,
                Support::Roller {
                    direction: RollerDirection::Y,
                },
            )
            .unwrap();
        assert!(matches!(
            classify(&model),
            Err(FrameError::Hypostatic { gh: -2, .. })
        ));
    }

    #[test]
    fn stable_structures_pass_the_rank_test() {
        let mut model = base_model(1);
        model.set_support(1, Support::Fixed).unwrap();
        check_stability(&model).unwrap();
        model.set_support(2, Support::Pinned).unwrap();
        check_stability(&model).unwrap();
    }

    #[test]
    fn parallel_rollers_are_a_mechanism_despite_the_count() {
        // three vertical rollers on two spans: gh = 0 but nothing holds X
        let mut model = base_model(2);
        for joint in 1..=3 {
            model
                .set_support(
                    joint,
                    Support::Roller {
                        direction: RollerDirection::Y,
                    },
                )
                .unwrap();
        }
        assert_eq!(model.degree_of_indeterminacy(), 0);
        assert!(matches!(
            check_stability(&model),
            Err(FrameError::Unstable(_))
        ));
    }

    #[test]
    fn hinge_next_to_a_free_rotation_is_a_mechanism() {
        // propped cantilever with a hinge at the roller end: the count
        // says isostatic, but a joint moment there cannot be resisted
        let mut model = base_model(1);
        model.set_support(1, Support::Fixed).unwrap();
        model
            .set_support(
                2,
                Support::Roller {
                    direction: RollerDirection::Y,
                },
            )
            .unwrap();
        model.bars.get_mut(&1).unwrap().hinge_j = true;
        assert_eq!(model.degree_of_indeterminacy(), 0);
        assert!(matches!(
            check_stability(&model),
            Err(FrameError::Unstable(_))
        ));
    }
}
