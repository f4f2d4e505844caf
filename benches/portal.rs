//! Benchmarks for the force-method pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flexframe::prelude::*;

fn create_portal_model() -> FrameModel {
    let mut model = FrameModel::new("portal");

    model.add_material("Steel", Material::steel()).unwrap();
    model
        .add_section("IPE200", Section::new(28.5e-4, 2.772e-5))
        .unwrap();

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
        .add_load(Load::Joint(JointLoad::horizontal(2, 20.0)))
        .unwrap();
    model
        .add_load(Load::BarDistributed(DistributedLoad::uniform_down(2, 8.0)))
        .unwrap();

    model
}

fn bench_portal_analysis(c: &mut Criterion) {
    let model = create_portal_model();
    let options = AnalysisOptions::default();

    c.bench_function("portal_analysis", |b| {
        b.iter(|| black_box(model.analyze(&options).unwrap()))
    });
}

fn bench_fixed_fixed_beam(c: &mut Criterion) {
    let mut model = FrameModel::new("beam");
    model.add_material("Steel", Material::steel()).unwrap();
    model
        .add_section("IPE200", Section::new(28.5e-4, 2.772e-5))
        .unwrap();
    model.add_joint(1, Joint::new(0.0, 0.0)).unwrap();
    model.add_joint(2, Joint::new(6.0, 0.0)).unwrap();
    model.add_bar(1, Bar::new(1, 2, "Steel", "IPE200")).unwrap();
    model.set_support(1, Support::Fixed).unwrap();
    model.set_support(2, Support::Fixed).unwrap();
    model
        .add_load(Load::BarPoint(BarPointLoad::transverse_down(1, 10.0, 3.0)))
        .unwrap();
    let options = AnalysisOptions::default();

    c.bench_function("fixed_fixed_beam", |b| {
        b.iter(|| black_box(model.analyze(&options).unwrap()))
    });
}

criterion_group!(benches, bench_portal_analysis, bench_fixed_fixed_beam);
criterion_main!(benches);
