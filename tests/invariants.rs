//! Universal properties every successful analysis must satisfy.

use flexframe::prelude::*;

fn add_library(model: &mut FrameModel) {
    model.add_material("Steel", Material::steel()).unwrap();
    model
        .add_section("IPE200", Section::new(28.5e-4, 2.772e-5).with_depth(0.2))
        .unwrap();
}

fn portal_with_load(factor: f64) -> FrameModel {
    let mut model = FrameModel::new("portal");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(0.0, 4.0)).unwrap();
    model.add_joint(3, Joint::new(6.0, 4.0)).unwrap();
    model.add_joint(4, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.add_bar(2, Bar::new(2, 3, "Steel", "IPE200")).unwrap();
    model.add_bar(3, Bar::new(3, 4, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model.set_support(4, Support::Fixed).unwrap();
    model
        .add_load(Load::Joint(JointLoad::horizontal(2, 20.0 * factor)))
        .unwrap();
    model
        .add_load(Load::BarDistributed(DistributedLoad::uniform_down(
            2,
            5.0 * factor,
        )))
        .unwrap();
    model
}

#[test]
fn doubling_loads_doubles_everything() {
    let base = portal_with_load(1.0)
        .analyze(&AnalysisOptions::default())
        .unwrap();
    let double = portal_with_load(2.0)
        .analyze(&AnalysisOptions::default())
        .unwrap();

    for (&joint, r1) in &base.reactions {
        let r2 = double.reaction(joint);
        assert!((r2.fx - 2.0 * r1.fx).abs() <= 1e-10 * r1.fx.abs().max(1.0));
        assert!((r2.fy - 2.0 * r1.fy).abs() <= 1e-10 * r1.fy.abs().max(1.0));
        assert!((r2.mz - 2.0 * r1.mz).abs() <= 1e-10 * r1.mz.abs().max(1.0));
    }
    for &bar in base.bar_fields.keys() {
        for x in [0.0, 1.0, 2.5, 4.0] {
            let m1 = base.m(bar, x);
            assert!((double.m(bar, x) - 2.0 * m1).abs() <= 1e-10 * m1.abs().max(1.0));
        }
    }
    for (&joint, d1) in &base.joint_displacements {
        let d2 = double.displacement(joint);
        assert!((d2.ux - 2.0 * d1.ux).abs() <= 1e-10 * d1.ux.abs().max(1e-9));
        assert!((d2.uy - 2.0 * d1.uy).abs() <= 1e-10 * d1.uy.abs().max(1e-9));
    }
}

#[test]
fn different_redundant_choices_agree() {
    let model = portal_with_load(1.0);
    let auto = model.analyze(&AnalysisOptions::default()).unwrap();
    let manual = model
        .analyze(&AnalysisOptions::default().with_redundants(vec![
            Redundant::ReactionMoment { joint: 1 },
            Redundant::ReactionMoment { joint: 4 },
            Redundant::ReactionX { joint: 4 },
        ]))
        .unwrap();

    for (&joint, ra) in &auto.reactions {
        let rm = manual.reaction(joint);
        let scale = ra.fx.abs().max(ra.fy.abs()).max(ra.mz.abs()).max(1.0);
        assert!((ra.fx - rm.fx).abs() < 1e-6 * scale);
        assert!((ra.fy - rm.fy).abs() < 1e-6 * scale);
        assert!((ra.mz - rm.mz).abs() < 1e-6 * scale);
    }
    for &bar in auto.bar_fields.keys() {
        for x in [0.5, 2.0, 3.5] {
            let scale = auto.m(bar, x).abs().max(1.0);
            assert!((auto.m(bar, x) - manual.m(bar, x)).abs() < 1e-6 * scale);
            assert!((auto.n(bar, x) - manual.n(bar, x)).abs() < 1e-6 * scale);
        }
    }
}

#[test]
fn releasing_a_whole_support_is_also_admissible() {
    // fixed-fixed beam solved on a cantilever primary
    let mut model = FrameModel::new("beam");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model.set_support(2, Support::Fixed).unwrap();
    model
        .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 3.0)))
        .unwrap();

    let auto = model.analyze(&AnalysisOptions::default()).unwrap();
    let cantilever_primary = model
        .analyze(&AnalysisOptions::default().with_redundants(vec![
            Redundant::ReactionX { joint: 2 },
            Redundant::ReactionY { joint: 2 },
            Redundant::ReactionMoment { joint: 2 },
        ]))
        .unwrap();

    for x in [0.0, 1.5, 3.0, 4.5, 6.0] {
        assert!((auto.m(1, x) - cantilever_primary.m(1, x)).abs() < 1e-6);
        assert!((auto.v(1, x) - cantilever_primary.v(1, x)).abs() < 1e-6);
    }
    let r = cantilever_primary.reaction(1);
    assert!((r.fy - 5.0).abs() < 1e-6);
    assert!((r.mz - 7.5).abs() < 1e-6);
}

#[test]
fn field_jumps_match_the_applied_actions() {
    let mut model = FrameModel::new("ss beam");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Pinned).unwrap();
    model
        .set_support(
            2,
            Support::Roller {
                direction: RollerDirection::Y,
            },
        )
        .unwrap();
    model
        .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 8.0, 2.0)))
        .unwrap();
    model
        .add_load(Load::BarDistributed(DistributedLoad::new(
            1,
            3.0,
            3.0,
            4.0,
            Some(6.0),
            -std::f64::consts::FRAC_PI_2,
        )))
        .unwrap();

    let result = model.analyze(&AnalysisOptions::default()).unwrap();
    let field = &result.bar_fields[&1];

    // shear drops by the point load, moment stays continuous
    let (_, v_before, m_before) = field.values_before(2.0);
    let (_, v_after, m_after) = field.values_after(2.0);
    assert!((v_before - v_after - 8.0).abs() < 1e-9);
    assert!((m_before - m_after).abs() < 1e-9);

    // no jump at the start of the distributed stretch
    let (_, v_b4, m_b4) = field.values_before(4.0);
    let (_, v_a4, m_a4) = field.values_after(4.0);
    assert!((v_b4 - v_a4).abs() < 1e-9);
    assert!((m_b4 - m_a4).abs() < 1e-9);
}

#[test]
fn bar_end_load_equals_joint_load() {
    let build = |use_bar_load: bool| {
        let mut model = FrameModel::new("prop");
        add_library(&mut model);
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
        model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
        model.set_support(1, Support::Fixed).unwrap();
        model
            .set_support(
                2,
                Support::Roller {
                    direction: RollerDirection::Y,
                },
            )
            .unwrap();
        if use_bar_load {
            model
                .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 0.0)))
                .unwrap();
        } else {
            model
                .add_load(Load::Joint(JointLoad::vertical_down(1, 10.0)))
                .unwrap();
        }
        model.analyze(&AnalysisOptions::default()).unwrap()
    };

    let via_bar = build(true);
    let via_joint = build(false);
    for x in [0.0, 2.0, 4.0, 6.0] {
        assert!((via_bar.m(1, x) - via_joint.m(1, x)).abs() < 1e-6);
        assert!((via_bar.v(1, x) - via_joint.v(1, x)).abs() < 1e-6);
    }
    for joint in [1, 2] {
        let a = via_bar.reaction(joint);
        let b = via_joint.reaction(joint);
        assert!((a.fy - b.fy).abs() < 1e-6);
        assert!((a.mz - b.mz).abs() < 1e-6);
    }
}

#[test]
fn timoshenko_mode_stays_close_for_slender_bars() {
    let mut model = FrameModel::new("beam");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model.set_support(2, Support::Fixed).unwrap();
    model
        .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 3.0)))
        .unwrap();

    let euler = model.analyze(&AnalysisOptions::default()).unwrap();
    let timo = model.analyze(&AnalysisOptions::timoshenko()).unwrap();
    // shear flexibility barely moves a slender beam's moments
    assert!((euler.m(1, 0.0) - timo.m(1, 0.0)).abs() / 7.5 < 0.05);
}

#[test]
fn hypostatic_models_are_refused() {
    let mut model = FrameModel::new("floating");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model
        .set_support(
            1,
            Support::Roller {
                direction: RollerDirection::Y,
            },
        )
        .unwrap();

    assert!(matches!(
        model.analyze(&AnalysisOptions::default()),
        Err(FrameError::Hypostatic { .. })
    ));
}

#[test]
fn parallel_restraints_are_refused_as_unstable() {
    let mut model = FrameModel::new("sled");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_joint(3, Joint::new(12.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.add_bar(2, Bar::new(2, 3, "Steel", "IPE200")).unwrap();
    for joint in [1, 2, 3] {
        model
            .set_support(
                joint,
                Support::Roller {
                    direction: RollerDirection::Y,
                },
            )
            .unwrap();
    }

    assert!(matches!(
        model.analyze(&AnalysisOptions::default()),
        Err(FrameError::Unstable(_))
    ));
}

#[test]
fn cancellation_returns_no_partial_result() {
    let model = portal_with_load(1.0);
    let cancel = CancelFlag::new();
    cancel.cancel();
    let options = AnalysisOptions::default().with_cancel(cancel);
    assert!(matches!(
        model.analyze(&options),
        Err(FrameError::Canceled)
    ));
}

#[test]
fn progress_reaches_completion() {
    let model = portal_with_load(1.0);
    let progress = Progress::new();
    let options = AnalysisOptions::default().with_progress(progress.clone());
    model.analyze(&options).unwrap();
    assert_eq!(progress.fraction(), 1.0);
}

#[test]
fn settlement_agrees_across_redundant_choices() {
    // propped cantilever with the prop settling 10 mm; solving with the
    // fixing moment released must match solving with the prop released
    let build = |manual: Option<Vec<Redundant>>| {
        let mut model = FrameModel::new("prop settlement");
        add_library(&mut model);
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
        model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
        model.set_support(1, Support::Fixed).unwrap();
        model
            .set_support(
                2,
                Support::Roller {
                    direction: RollerDirection::Y,
                },
            )
            .unwrap();
        model
            .add_load(Load::ImposedDisplacement(ImposedDisplacement::settlement(
                2, 0.010,
            )))
            .unwrap();
        let mut options = AnalysisOptions::default();
        options.manual_redundants = manual;
        model.analyze(&options).unwrap()
    };

    let via_moment = build(None); // selector picks Mz at the fixed joint
    let via_prop = build(Some(vec![Redundant::ReactionY { joint: 2 }]));

    // closed form: R = -3 EI d / L^3 pulls the beam down to the prop
    let ei = 200e6 * 2.772e-5;
    let expected_prop = -3.0 * ei * 0.010 / 216.0;
    assert!((via_moment.reaction(2).fy - expected_prop).abs() < 1e-9);
    assert!((via_prop.reaction(2).fy - expected_prop).abs() < 1e-9);

    for x in [0.0, 2.0, 4.0, 6.0] {
        assert!((via_moment.m(1, x) - via_prop.m(1, x)).abs() < 1e-6);
    }
    assert!((via_moment.displacement(2).uy + 0.010).abs() < 1e-12);
}

#[test]
fn internal_release_matches_reaction_release() {
    // two-span continuous beam under uniform load: releasing the bending
    // moment over the center support must agree with releasing an outer
    // reaction, and both with the textbook answer
    let q = 8.0;
    let build = |manual: Option<Vec<Redundant>>| {
        let mut model = FrameModel::new("two spans");
        add_library(&mut model);
        model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
        model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
        model.add_joint(3, Joint::new(12.0, 0.0)).unwrap();
        model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
        model.add_bar(2, Bar::new(2, 3, "Steel", "IPE200")).unwrap();
        model.set_support(1, Support::Pinned).unwrap();
        for joint in [2, 3] {
            model
                .set_support(
                    joint,
                    Support::Roller {
                        direction: RollerDirection::Y,
                    },
                )
                .unwrap();
        }
        for bar in [1, 2] {
            model
                .add_load(Load::BarDistributed(DistributedLoad::uniform_down(bar, q)))
                .unwrap();
        }
        let mut options = AnalysisOptions::default();
        options.manual_redundants = manual;
        model.analyze(&options).unwrap()
    };

    let auto = build(None);
    let released = build(Some(vec![Redundant::InternalMoment { bar: 1, x: 6.0 }]));

    // hogging moment over the center support: +q L^2 / 8
    let expected = q * 36.0 / 8.0;
    assert!((auto.m(1, 6.0) - expected).abs() < 1e-6);
    assert!((released.m(1, 6.0) - expected).abs() < 1e-6);

    // outer reactions carry 3qL/8
    assert!((auto.reaction(1).fy - 3.0 * q * 6.0 / 8.0).abs() < 1e-6);

    for x in [1.0, 3.0, 5.0] {
        assert!((auto.m(1, x) - released.m(1, x)).abs() < 1e-6);
        assert!((auto.m(2, x) - released.m(2, x)).abs() < 1e-6);
        assert!((auto.v(1, x) - released.v(1, x)).abs() < 1e-6);
    }
}

#[test]
fn unrestrained_heating_expands_freely() {
    let mut model = FrameModel::new("hot cantilever");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model
        .add_load(Load::Thermal(ThermalLoad::uniform(1, 30.0)))
        .unwrap();

    let result = model.analyze(&AnalysisOptions::default()).unwrap();

    // an isostatic bar heats up without internal forces
    for x in [0.0, 3.0, 6.0] {
        assert!(result.n(1, x).abs() < 1e-9);
        assert!(result.m(1, x).abs() < 1e-9);
    }
    // and the free end moves out by alpha * dT * L
    let expected = 1.2e-5 * 30.0 * 6.0;
    assert!((result.displacement(2).ux - expected).abs() < 1e-12);
    assert!(result.displacement(2).uy.abs() < 1e-12);
}

#[test]
fn cantilever_deflection_matches_closed_form() {
    let mut model = FrameModel::new("cantilever");
    add_library(&mut model);
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model
        .add_load(Load::Joint(JointLoad::vertical_down(2, 10.0)))
        .unwrap();

    let result = model.analyze(&AnalysisOptions::default()).unwrap();
    assert_eq!(result.gh, 0);

    let ei = 200e6 * 2.772e-5;
    let expected_tip = -10.0 * 216.0 / (3.0 * ei);
    let tip = result.displacement(2);
    assert!((tip.uy - expected_tip).abs() < 1e-9 * expected_tip.abs());

    // the elastic curve agrees with the recovered joint displacement
    let curve = result.deflection(1).unwrap();
    assert!((curve.deflection(6.0) - expected_tip).abs() < 1e-9 * expected_tip.abs());
    assert!(curve.deflection(0.0).abs() < 1e-15);
    assert!((curve.rotation(6.0) - tip.rz).abs() < 1e-12);
}
