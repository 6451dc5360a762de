// File: crates/tabula-core/src/grid.rs
// Summary: Simple grid/level layout helpers.

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Radii of `levels` concentric rings out to `radius`, outermost first.
pub fn ring_radii(radius: f64, levels: usize) -> Vec<f64> {
    (1..=levels).rev().map(|l| radius * l as f64 / levels as f64).collect()
}
