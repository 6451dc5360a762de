// File: crates/tabula-core/src/types.rs
// Summary: Shared types and constants (canvas sizes, margins, render options).

use serde::{Deserialize, Deserializer};

use crate::theme::{self, Theme};

/// Default canvas width in pixels.
pub const WIDTH: u32 = 1024;
/// Default canvas height in pixels.
pub const HEIGHT: u32 = 640;

/// Margins around a plot area, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(72, 24, 24, 56)
    }
}

/// Default plot margins; room for a title above and axis labels on the left and below.
const PLOT_INSETS: Insets = Insets::new(80, 80, 60, 80);

/// Canvas size, plot margins and theme for one chart.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub insets: Insets,
    #[serde(deserialize_with = "theme_by_name")]
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            insets: PLOT_INSETS,
            theme: Theme::light(),
        }
    }
}

impl RenderOptions {
    pub fn sized(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

fn theme_by_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Theme, D::Error> {
    let name = String::deserialize(deserializer)?;
    Ok(theme::find(&name))
}
