// File: crates/tabula-core/src/geometry.rs
// Summary: Lightweight geometry helpers for plot-area and radial pixel math.

use crate::types::Insets;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    /// Plot area left after removing `insets` from a `width × height` canvas.
    /// Collapses to zero size instead of going negative.
    pub fn inset(width: u32, height: u32, insets: &Insets) -> Self {
        let w = (width as f64 - insets.hsum() as f64).max(0.0);
        let h = (height as f64 - insets.vsum() as f64).max(0.0);
        Self::from_ltwh(insets.left as f64, insets.top as f64, w, h)
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }
    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) * 0.5, (self.top + self.bottom) * 0.5)
    }
}

/// Point at `radius` along spoke `index` of `count`, spoke 0 pointing up.
pub fn spoke(radius: f64, index: usize, count: usize) -> (f64, f64) {
    let angle = spoke_angle(index, count);
    (radius * angle.cos(), radius * angle.sin())
}

pub fn spoke_angle(index: usize, count: usize) -> f64 {
    let slice = std::f64::consts::TAU / count.max(1) as f64;
    slice * index as f64 - std::f64::consts::FRAC_PI_2
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}
