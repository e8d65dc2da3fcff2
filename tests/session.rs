use std::sync::Arc;

use curvekit::data::{DataStore, DatasetProvider};
use curvekit::domain::{Dataset, Point};
use curvekit::tplate::{ArgSlot, Body, Component, FunctionKind, Tplate, TplateMgr, reorder_args};
use curvekit::vm::{DatasetTransformer, Opcode, ProgramBuilder, Target, transform};
use curvekit::{Error, Settings};

fn spectrum(title: &str, offset: f64) -> Dataset {
    let xs: Vec<f64> = (0..11).map(|i| i as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| offset + (-(x - 5.0).powi(2) / 2.0).exp()).collect();
    Dataset::from_xy(&xs, &ys, title)
}

#[test]
fn builtin_registry_supports_composition() {
    let mut mgr = TplateMgr::new();
    mgr.add_builtin_types(None).unwrap();

    let gaussian = mgr.get_shared_tp("Gaussian").unwrap();
    let cargs = |h: f64, c: f64, w: f64| {
        vec![
            ProgramBuilder::new().number(h).build(),
            ProgramBuilder::new().number(c).build(),
            ProgramBuilder::new().number(w).build(),
        ]
    };
    let doublet = Tplate::new(
        "Doublet",
        vec!["h".into()],
        Vec::new(),
        "Gaussian(h, 1, 0.5) + Gaussian(h, 3, 0.5)",
        Body::Sum(vec![
            Component::new("Gaussian", cargs(1.0, 1.0, 0.5)),
            Component::new("Gaussian", cargs(1.0, 3.0, 0.5)),
        ]),
    )
    .unwrap();
    let doublet = mgr.define(doublet).unwrap();
    assert_eq!(doublet.kind(), FunctionKind::Compound);
    assert_eq!(doublet.as_definition(), "Doublet(h) = Gaussian(h, 1, 0.5) + Gaussian(h, 3, 0.5)");

    assert!(matches!(mgr.undefine("Gaussian"), Err(Error::InUse { .. })));

    let f = doublet.bind("%f1", vec!["_1".into()]).unwrap();
    assert!(Arc::ptr_eq(&f.tplate, &doublet));

    // Keyword call on a builtin: hwhm falls back to its peak trait.
    let args = reorder_args(&gaussian, &["center", "height"], vec!["2.5", "10"]).unwrap();
    assert_eq!(args, vec![ArgSlot::Given("10"), ArgSlot::Given("2.5"), ArgSlot::Default("hwhm")]);
}

#[test]
fn background_subtraction_session() {
    let settings = Settings::default();
    let mut store = DataStore::with_datasets(vec![spectrum("raw", 1.0)]);

    // @+ = shirley_bg(@0)
    let bg = ProgramBuilder::new().dataset(0).op(Opcode::DtShirleyBg).build();
    let bg_index = transform(&mut store, &settings, &bg, Target::New).unwrap();
    assert_eq!(bg_index, 1);

    // @0 = @0 - @1
    let subtract = ProgramBuilder::new().dataset(0).dataset(1).op(Opcode::Sub).build();
    transform(&mut store, &settings, &subtract, Target::Index(0)).unwrap();

    let corrected = store.dataset(0).unwrap();
    assert_eq!(corrected.title, "raw-raw");
    assert!(corrected.points[0].y.abs() < 1e-5, "left edge {}", corrected.points[0].y);
    assert!(corrected.points[10].y.abs() < 1e-5, "right edge {}", corrected.points[10].y);
    assert!(corrected.points[5].y > 0.5, "peak {}", corrected.points[5].y);
}

#[test]
fn failed_transformations_leave_store_untouched() {
    let settings = Settings::default();
    let mut store = DataStore::with_datasets(vec![spectrum("a", 0.0), spectrum("b", 2.0)]);
    let before = store.datasets().to_vec();

    // @+ = @0 + 0
    let mixed = ProgramBuilder::new().dataset(0).number(0.0).op(Opcode::Add).build();
    let err = transform(&mut store, &settings, &mixed, Target::New).unwrap_err();
    assert!(matches!(err, Error::Type(_)));

    // @1 = sin(@0)
    let sin = ProgramBuilder::new().dataset(0).op(Opcode::Sin).build();
    let err = transform(&mut store, &settings, &sin, Target::Index(1)).unwrap_err();
    assert_eq!(err, Error::UnsupportedOpcode("sin".into()));

    assert_eq!(store.count(), 2);
    assert_eq!(store.datasets(), before.as_slice());
}

#[test]
fn merge_and_concatenate_through_transformer() {
    let settings = Settings::default();
    let mut store = DataStore::with_datasets(vec![
        Dataset::new(vec![Point::new(0.0, 1.0), Point::new(2.0, 3.0)], "a"),
        Dataset::new(vec![Point::new(2.0, 5.0), Point::new(1.0, 2.0)], ""),
    ]);

    // @+ = avg_same_x(@0 and @1)
    let program = ProgramBuilder::new()
        .dataset(0)
        .op(Opcode::And)
        .dataset(1)
        .op(Opcode::AfterAnd)
        .op(Opcode::DtAvgSameX)
        .build();
    let mut transformer = DatasetTransformer::new(&mut store, &settings);
    let index = transformer.run(&program, Target::New).unwrap();

    let merged = store.dataset(index).unwrap();
    assert_eq!(merged.title, "a&nt");
    let xy: Vec<(f64, f64)> = merged.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(xy, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 4.0)]);

    // @0 = 0
    let clear = ProgramBuilder::new().number(0.0).build();
    transform(&mut store, &settings, &clear, Target::Index(0)).unwrap();
    assert!(store.dataset(0).unwrap().is_empty());
}
