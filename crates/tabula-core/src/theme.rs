// File: crates/tabula-core/src/theme.rs
// Summary: Light/Dark theming for chart chrome (background, axes, grid, annotations).

use crate::color::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    pub plot_background: Rgba,
    pub grid: Rgba,
    pub axis_line: Rgba,
    pub axis_label: Rgba,
    pub tick: Rgba,
    pub text: Rgba,
    /// Stroke around a selected mark.
    pub emphasis: Rgba,
    /// Outline drawn around point marks in their base style.
    pub mark_outline: Rgba,
    /// Fill of cells with no contributing records.
    pub empty_cell: Rgba,
    pub cell_stroke: Rgba,
    pub tooltip_background: Rgba,
    pub tooltip_border: Rgba,
    pub error: Rgba,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Rgba::WHITE,
            plot_background: Rgba::rgb(0xf9, 0xf9, 0xf9),
            grid: Rgba::rgb(0xe0, 0xe0, 0xe0),
            axis_line: Rgba::rgb(0x00, 0x00, 0x00),
            axis_label: Rgba::rgb(0x00, 0x00, 0x00),
            tick: Rgba::rgb(0x33, 0x33, 0x33),
            text: Rgba::rgb(0x00, 0x00, 0x00),
            emphasis: Rgba::rgb(0x00, 0x00, 0x00),
            mark_outline: Rgba::WHITE,
            empty_cell: Rgba::rgb(0xee, 0xee, 0xee),
            cell_stroke: Rgba::rgb(0xcc, 0xcc, 0xcc),
            tooltip_background: Rgba::WHITE,
            tooltip_border: Rgba::rgb(0xdd, 0xdd, 0xdd),
            error: Rgba::rgb(0xff, 0x00, 0x00),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Rgba::rgb(18, 18, 20),
            plot_background: Rgba::rgb(26, 26, 30),
            grid: Rgba::rgb(40, 40, 45),
            axis_line: Rgba::rgb(180, 180, 190),
            axis_label: Rgba::rgb(235, 235, 245),
            tick: Rgba::rgb(150, 150, 160),
            text: Rgba::rgb(235, 235, 245),
            emphasis: Rgba::rgb(255, 230, 70),
            mark_outline: Rgba::rgb(18, 18, 20),
            empty_cell: Rgba::rgb(48, 48, 54),
            cell_stroke: Rgba::rgb(70, 70, 78),
            tooltip_background: Rgba::rgb(32, 32, 36),
            tooltip_border: Rgba::rgb(90, 90, 100),
            error: Rgba::rgb(220, 80, 80),
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: Rgba::rgb(0x00, 0x00, 0x00),
            plot_background: Rgba::rgb(0x00, 0x00, 0x00),
            grid: Rgba::rgb(0x22, 0x22, 0x22),
            axis_line: Rgba::rgb(0xff, 0xff, 0xff),
            axis_label: Rgba::rgb(0xff, 0xff, 0xff),
            tick: Rgba::rgb(0xcc, 0xcc, 0xcc),
            text: Rgba::rgb(0xff, 0xff, 0xff),
            emphasis: Rgba::rgb(0xff, 0xff, 0x00),
            mark_outline: Rgba::rgb(0x00, 0x00, 0x00),
            empty_cell: Rgba::rgb(0x22, 0x22, 0x22),
            cell_stroke: Rgba::rgb(0x55, 0x55, 0x55),
            tooltip_background: Rgba::rgb(0x00, 0x00, 0x00),
            tooltip_border: Rgba::rgb(0xff, 0xff, 0xff),
            error: Rgba::rgb(0xff, 0x00, 0x00),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() {
        if t.name.eq_ignore_ascii_case(name) {
            return t;
        }
    }
    Theme::light()
}
