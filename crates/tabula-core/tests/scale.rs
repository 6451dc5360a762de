// File: crates/tabula-core/tests/scale.rs
// Purpose: Scale binding: nice domains, headroom, degenerate and empty domains, band/point layout.

use tabula_core::color::{ColorRamp, Rgba};
use tabula_core::scale::{ticks, BandScale, LinearScale, PointScale, ScaleTransform};
use tabula_core::{bind_scale, ChartError, DomainSource, Range, ScaleKind, ScaleOptions, Value};

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn headroom_then_nice_rounds_up_to_a_tick() {
    let values = [0.0, 3.0, 7.0, 10.0];
    let domain = DomainSource::zero_to_max(values.iter(), |v| *v);
    let opts = ScaleOptions::default().headroom(1.05).nice(10);
    let scale = bind_scale(ScaleKind::Linear, domain.clone(), Range::Pixels(0.0, 100.0), &opts)
        .unwrap()
        .into_linear()
        .unwrap();
    assert_eq!(scale.domain(), (0.0, 11.0));

    let coarse = bind_scale(ScaleKind::Linear, domain, Range::Pixels(0.0, 100.0), &opts.nice(5))
        .unwrap()
        .into_linear()
        .unwrap();
    assert_eq!(coarse.domain(), (0.0, 12.0));
}

#[test]
fn nice_leaves_round_domains_alone() {
    assert_eq!(LinearScale::new((0.0, 20.0), (0.0, 1.0)).nice(10).domain(), (0.0, 20.0));
    assert_eq!(LinearScale::new((0.0, 5.0), (0.0, 1.0)).nice(10).domain(), (0.0, 5.0));
    assert_eq!(LinearScale::new((0.13, 0.87), (0.0, 1.0)).nice(10).domain(), (0.1, 0.9));
}

#[test]
fn map_and_invert() {
    let s = LinearScale::new((0.0, 20.0), (400.0, 0.0));
    approx(s.map(5.0), 300.0);
    approx(s.invert(300.0), 5.0);
    approx(s.map(-5.0), 500.0);
    approx(s.with_clamp(true).map(-5.0), 400.0);
}

#[test]
fn empty_subset_yields_a_degenerate_domain() {
    let none: [f64; 0] = [];
    let domain = DomainSource::extent_of(none.iter(), |v| *v);
    assert_eq!(domain, DomainSource::Extent(0.0, 0.0));
    let scale = bind_scale(ScaleKind::Linear, domain, Range::Pixels(0.0, 200.0), &ScaleOptions::default().nice(10))
        .unwrap()
        .into_linear()
        .unwrap();
    approx(scale.map(123.0), 100.0);
    assert_eq!(scale.ticks(10), vec![0.0]);
}

#[test]
fn decimal_ticks_are_exact() {
    assert_eq!(ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    assert_eq!(ticks(0.0, 11.0, 10).len(), 12);
    assert_eq!(ticks(10.0, 0.0, 2), vec![10.0, 5.0, 0.0]);
}

#[test]
fn band_layout_with_padding() {
    let domain: Vec<String> = ["a", "b"].map(String::from).to_vec();
    let band = BandScale::new(domain.clone(), (0.0, 100.0), 0.5);
    approx(band.step(), 40.0);
    approx(band.bandwidth(), 20.0);
    approx(band.map("a").unwrap(), 20.0);
    approx(band.map("b").unwrap(), 60.0);
    approx(band.center("b").unwrap(), 70.0);
    assert_eq!(band.map("c"), None);

    let flush = BandScale::new(["1", "2", "3", "4"].map(String::from).to_vec(), (0.0, 100.0), 0.0);
    approx(flush.bandwidth(), 25.0);
    approx(flush.map("4").unwrap(), 75.0);
    assert_eq!(flush.position(&Value::Number(3.0)), Some(50.0));
}

#[test]
fn point_scale_spans_the_range() {
    let dims: Vec<String> = ["studytime", "freetime", "goout", "Walc", "Dalc", "G3"].map(String::from).to_vec();
    let point = PointScale::new(dims, (0.0, 500.0), 0.0);
    approx(point.map("studytime").unwrap(), 0.0);
    approx(point.map("freetime").unwrap(), 100.0);
    approx(point.map("G3").unwrap(), 500.0);
    approx(point.step(), 100.0);

    let single = PointScale::new(vec!["only".into()], (0.0, 500.0), 0.0);
    approx(single.map("only").unwrap(), 250.0);
}

#[test]
fn repeated_categories_share_one_slot() {
    let dims: Vec<String> = ["studytime", "G3", "G3"].map(String::from).to_vec();
    let point = PointScale::new(dims, (0.0, 610.0), 0.0);
    assert_eq!(point.domain(), ["studytime", "G3"]);
    approx(point.map("G3").unwrap(), 610.0);
    approx(point.step(), 610.0);

    let band = BandScale::new(["a", "b", "a", "c"].map(String::from).to_vec(), (0.0, 300.0), 0.0);
    assert_eq!(band.domain(), ["a", "b", "c"]);
    approx(band.map("c").unwrap(), 200.0);
    approx(band.bandwidth(), 100.0);
}

#[test]
fn sequential_maps_onto_the_ramp() {
    let from = Rgba::rgb(0xFF, 0x5C, 0x8D);
    let to = Rgba::rgb(0x2E, 0x86, 0xC1);
    let scale = bind_scale(
        ScaleKind::Sequential,
        DomainSource::Extent(0.0, 20.0),
        Range::Colors(ColorRamp::between(from, to)),
        &ScaleOptions::default(),
    )
    .unwrap()
    .into_sequential()
    .unwrap();
    assert_eq!(scale.map(0.0), from);
    assert_eq!(scale.map(20.0), to);
    assert_eq!(scale.map(40.0), to);
}

#[test]
fn kind_and_domain_must_agree() {
    let err = bind_scale(
        ScaleKind::Band,
        DomainSource::Extent(0.0, 1.0),
        Range::Pixels(0.0, 1.0),
        &ScaleOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ChartError::DomainMismatch { kind: ScaleKind::Band, .. }));

    let linear = bind_scale(
        ScaleKind::Linear,
        DomainSource::Extent(0.0, 1.0),
        Range::Pixels(0.0, 1.0),
        &ScaleOptions::default(),
    )
    .unwrap();
    assert!(linear.as_band().is_none());
    assert!(matches!(linear.into_band(), Err(ChartError::DomainMismatch { .. })));
}

#[test]
fn position_dispatches_by_kind() {
    let band = bind_scale(
        ScaleKind::Band,
        DomainSource::categories(["x", "y"]),
        Range::Pixels(0.0, 10.0),
        &ScaleOptions::default(),
    )
    .unwrap();
    assert_eq!(band.kind(), ScaleKind::Band);
    assert_eq!(band.position(&Value::Text("y".into())), Some(5.0));
    assert_eq!(band.position(&Value::Text("z".into())), None);

    let linear = bind_scale(ScaleKind::Linear, DomainSource::Extent(0.0, 10.0), Range::Pixels(0.0, 10.0), &ScaleOptions::default()).unwrap();
    assert_eq!(linear.position(&Value::Number(4.0)), Some(4.0));
    assert_eq!(linear.position(&Value::Number(f64::NAN)), None);
}
