// File: crates/tabula-core/tests/render.rs
// Purpose: Keyed join semantics of render/update, emphasis overlays, error display and SVG output.

use tabula_core::color::Rgba;
use tabula_core::mark::Font;
use tabula_core::{render, Canvas, Emphasis, Mark, MarkKey, Shape, Style, Theme};

#[derive(Clone, Debug)]
struct Item {
    id: &'static str,
    v: f64,
}

fn items(spec: &[(&'static str, f64)]) -> Vec<Item> {
    spec.iter().map(|&(id, v)| Item { id, v }).collect()
}

fn key(i: &Item) -> MarkKey {
    MarkKey::from(i.id)
}

fn dot(i: &Item) -> Mark {
    Mark::new(Shape::Circle { cx: i.v, cy: 0.0, r: 5.0 }, Style::fill(Rgba::BLACK))
}

fn canvas() -> (Canvas, tabula_core::LayerId) {
    let mut c = Canvas::new(200, 100, Theme::light());
    let layer = c.add_layer("points", (0.0, 0.0));
    (c, layer)
}

#[test]
fn render_draws_one_mark_per_item() {
    let (mut c, layer) = canvas();
    let data = items(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
    let handle = render(&mut c, layer, &data, key, dot);
    assert_eq!(handle.len(&c), 3);
    let keys: Vec<String> = handle.keys(&c).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn update_joins_by_key() {
    let (mut c, layer) = canvas();
    let mut handle = render(&mut c, layer, &items(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]), key, dot);

    let next = items(&[("d", 9.0), ("c", 30.0), ("a", 10.0)]);
    let summary = handle.update(&mut c, &next, key, dot);
    assert_eq!((summary.entered, summary.updated, summary.exited), (1, 2, 1));

    // survivors keep their slot, newcomers are appended
    let keys: Vec<String> = handle.keys(&c).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["a", "c", "d"]);
    let a = handle.mark(&c, &MarkKey::from("a")).unwrap();
    assert_eq!(a.shape, Shape::Circle { cx: 10.0, cy: 0.0, r: 5.0 });
}

#[test]
fn update_is_idempotent() {
    let (mut c, layer) = canvas();
    let data = items(&[("a", 1.0), ("b", 2.0)]);
    let mut handle = render(&mut c, layer, &data, key, dot);
    handle.update(&mut c, &data, key, dot);
    let first = c.layer(layer).clone();
    let summary = handle.update(&mut c, &data, key, dot);
    assert_eq!(c.layer(layer), &first);
    assert_eq!((summary.entered, summary.updated, summary.exited), (0, 2, 0));
}

#[test]
fn empty_update_removes_every_mark() {
    let (mut c, layer) = canvas();
    let mut handle = render(&mut c, layer, &items(&[("a", 1.0)]), key, dot);
    let summary = handle.update(&mut c, &Vec::<Item>::new(), key, dot);
    assert_eq!(summary.exited, 1);
    assert!(handle.is_empty(&c));
}

#[test]
fn duplicate_keys_keep_the_first_item() {
    let (mut c, layer) = canvas();
    let handle = render(&mut c, layer, &items(&[("a", 1.0), ("a", 2.0), ("b", 3.0)]), key, dot);
    assert_eq!(handle.len(&c), 2);
    let a = handle.mark(&c, &MarkKey::from("a")).unwrap();
    assert_eq!(a.shape, Shape::Circle { cx: 1.0, cy: 0.0, r: 5.0 });
}

#[test]
fn emphasis_overlays_and_reverts_exactly() {
    let (mut c, layer) = canvas();
    let data = items(&[("a", 1.0), ("b", 2.0)]);
    let mut handle = render(&mut c, layer, &data, key, dot);
    let base = c.layer(layer).clone();

    assert!(handle.emphasize(&mut c, &MarkKey::from("a"), Emphasis::selected(Rgba::BLACK)));
    let a = handle.mark(&c, &MarkKey::from("a")).unwrap();
    let (shape, style) = a.appearance();
    assert_eq!(shape, Shape::Circle { cx: 1.0, cy: 0.0, r: 8.0 });
    assert_eq!(style.stroke_width, 2.0);
    assert_eq!(style.opacity, 1.0);

    // the overlay survives a rejoin
    handle.update(&mut c, &data, key, dot);
    assert!(handle.mark(&c, &MarkKey::from("a")).unwrap().is_emphasized());

    assert!(handle.revert(&mut c, &MarkKey::from("a")));
    assert_eq!(c.layer(layer), &base);
    assert!(!handle.emphasize(&mut c, &MarkKey::from("zz"), Emphasis::hovered()));
}

#[test]
fn show_error_replaces_the_scene() {
    let (mut c, layer) = canvas();
    render(&mut c, layer, &items(&[("a", 1.0)]), key, dot);
    c.show_error("Error loading data");
    assert!(c.layer(layer).marks.is_empty());
    assert_eq!(c.mark_count(), 1);
    let svg = c.to_svg();
    assert!(svg.contains(">Error loading data</text>"), "{svg}");
    assert!(svg.contains(&format!("fill=\"{}\"", Theme::light().error.to_hex())));
}

#[test]
fn svg_escapes_text_and_splits_paths() {
    let (mut c, layer) = canvas();
    c.push(layer, Mark::new(Shape::text(1.0, 2.0, "a < b & c", Font::sized(12.0)), Style::fill(Rgba::BLACK)));
    c.push(
        layer,
        Mark::new(
            Shape::Path { points: vec![(0.0, 0.0), (1.0, 1.0), (2.0, f64::NAN), (3.0, 3.0), (4.0, 4.0)], closed: false },
            Style::stroke(Rgba::BLACK, 1.5),
        )
        .keyed("line"),
    );
    let svg = c.to_svg();
    assert!(svg.contains("a &lt; b &amp; c"));
    assert!(svg.contains(r#"d="M0,0L1,1M3,3L4,4""#), "{svg}");
    assert!(svg.contains(r#"data-key="line""#));
    assert!(svg.contains(r#"data-layer="points""#));
}

#[test]
fn compound_keys_escape_the_separator() {
    let plain = MarkKey::compound(&["2", "G1"]);
    assert_eq!(plain.as_str(), "2|G1");
    assert_eq!(plain.parts(), ["2", "G1"]);

    let left = MarkKey::compound(&["a|b", "c"]);
    let right = MarkKey::compound(&["a", "b|c"]);
    assert_ne!(left, right);
    assert_eq!(left.parts(), ["a|b", "c"]);
    assert_eq!(right.parts(), ["a", "b|c"]);
    assert_eq!(MarkKey::compound(&["back\\slash", ""]).parts(), ["back\\slash", ""]);
}
