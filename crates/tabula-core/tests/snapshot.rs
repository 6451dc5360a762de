// File: crates/tabula-core/tests/snapshot.rs
// Purpose: Golden SVG snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small scatter and heatmap to SVG text.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares the text exactly.
// - Else, logs a note and returns (skips) without failing to ease first run.

use std::path::PathBuf;

use tabula_core::charts::{Heatmap, HeatmapConfig, Scatter, ScatterConfig};
use tabula_core::{load, Canvas, DataContext, Schema, Theme};

const ROWS: &str = "\
kind,group,x,y
a,1,1,2
b,1,2,4
a,2,3,1
c,2,4,3
";

fn data() -> DataContext {
    DataContext::new("snapshot", load(ROWS, &Schema::new().number("x").number("y")).expect("load"))
}

fn scatter_svg() -> String {
    let mut canvas = Canvas::new(400, 300, Theme::light());
    let config = ScatterConfig {
        title: "Snapshot".into(),
        x_field: "x".into(),
        y_field: "y".into(),
        color_field: "kind".into(),
        ..ScatterConfig::default()
    };
    Scatter::mount(&mut canvas, &data(), &config).expect("mount scatter");
    canvas.to_svg()
}

fn heatmap_svg() -> String {
    let mut canvas = Canvas::new(400, 300, Theme::light());
    let config = HeatmapConfig {
        row_field: "kind".into(),
        column_field: "group".into(),
        ..HeatmapConfig::default()
    };
    Heatmap::mount(&mut canvas, &data(), &config).expect("mount heatmap");
    canvas.to_svg()
}

fn check(name: &str, got: &str) {
    let snap_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, got).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), got.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read_to_string(&snap_path).expect("read snapshot");
        assert_eq!(got, want, "rendered SVG differs from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_scatter() {
    let svg = scatter_svg();
    assert_eq!(svg, scatter_svg(), "rendering must be deterministic");
    check("scatter.svg", &svg);
}

#[test]
fn golden_heatmap() {
    let svg = heatmap_svg();
    assert!(svg.starts_with("<svg"), "{svg}");
    check("heatmap.svg", &svg);
}
