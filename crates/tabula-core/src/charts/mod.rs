// File: crates/tabula-core/src/charts/mod.rs
// Summary: Chart kinds built on the generic pipeline, plus helpers they share
// (plot frame, titles, notes, tooltips, emphasis effects).

pub mod bar;
pub mod heatmap;
pub mod parallel;
pub mod radar;
pub mod scatter;

pub use bar::{Bar, BarConfig, BarGroup, BarSeries};
pub use heatmap::{Heatmap, HeatmapConfig};
pub use parallel::{Parallel, ParallelConfig};
pub use radar::{Radar, RadarConfig};
pub use scatter::{Annotation, Scatter, ScatterConfig, TooltipField};

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::geometry::{clamp, Rect};
use crate::interaction::{Effect, EmphasisKind};
use crate::mark::{Anchor, Emphasis, Font, Mark, Shape, Style};
use crate::render::Handle;
use crate::text::{approx_width, wrap};
use crate::theme::Theme;
use crate::types::Insets;

const TOOLTIP_FONT: f64 = 12.0;
const TOOLTIP_PAD: f64 = 8.0;

/// The plot rect inside the chart's own margin, or the canvas insets when it has none.
pub(crate) fn frame(canvas: &Canvas, margin: Option<Insets>) -> Rect {
    let margin = margin.unwrap_or_else(|| canvas.insets());
    Rect::inset(canvas.width(), canvas.height(), &margin)
}

/// Centered chart title `offset` pixels above the plot top.
pub(crate) fn title(text: &str, plot: &Rect, offset: f64, theme: &Theme) -> Mark {
    let (cx, _) = plot.center();
    Mark::new(
        Shape::text(cx, plot.top - offset, text, Font::sized(18.0).anchor(Anchor::Middle).bold()),
        Style::fill(theme.text),
    )
    .keyed("chart-title")
    .with_class("chart-title")
}

/// Multi-line note wrapped to `width`, 1.1em line height.
pub(crate) fn note(text: &str, (x, y): (f64, f64), width: f64, anchor: Anchor, theme: &Theme) -> Vec<Mark> {
    let size = 12.0;
    wrap(text, size, width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            Mark::new(
                Shape::text(x, y + i as f64 * size * 1.1, line, Font::sized(size).anchor(anchor)),
                Style::fill(theme.text),
            )
            .keyed(format!("note-{i}"))
            .with_class("note")
        })
        .collect()
}

/// Boxed lines of text placed right of `anchor`, kept inside `bounds`.
pub(crate) fn tooltip(lines: &[String], (ax, ay): (f64, f64), bounds: &Rect, theme: &Theme) -> Vec<Mark> {
    if lines.is_empty() {
        return Vec::new();
    }
    let line_height = TOOLTIP_FONT * 1.3;
    let width = lines.iter().map(|l| approx_width(l, TOOLTIP_FONT)).fold(0.0, f64::max) + TOOLTIP_PAD * 2.0;
    let height = lines.len() as f64 * line_height + TOOLTIP_PAD * 2.0;
    let x = clamp(ax + 10.0, bounds.left, (bounds.right - width).max(bounds.left));
    let y = clamp(ay - 28.0, bounds.top, (bounds.bottom - height).max(bounds.top));

    let mut out = vec![Mark::new(
        Shape::Rect { x, y, width, height },
        Style::fill(theme.tooltip_background).with_stroke(theme.tooltip_border, 1.0).with_opacity(0.9),
    )
    .keyed("tooltip-box")
    .with_class("tooltip")];
    out.extend(lines.iter().enumerate().map(|(i, line)| {
        Mark::new(
            Shape::text(x + TOOLTIP_PAD, y + TOOLTIP_PAD + (i as f64 + 0.8) * line_height, line, Font::sized(TOOLTIP_FONT)),
            Style::fill(theme.text),
        )
        .keyed(format!("tooltip-{i}"))
        .with_class("tooltip")
    }));
    out
}

/// Apply the mark-level effects every interactive chart handles the same way.
/// Returns `false` for effects the chart has to handle itself.
pub(crate) fn apply_emphasis(
    canvas: &mut Canvas,
    marks: &Handle,
    effect: &Effect,
    emphasis: impl Fn(EmphasisKind) -> Emphasis,
) -> bool {
    match effect {
        Effect::Revert(key) => {
            marks.revert(canvas, key);
            true
        }
        Effect::Emphasize(key, kind) => {
            marks.emphasize(canvas, key, emphasis(*kind));
            true
        }
        _ => false,
    }
}

/// Shift every mark by `(dx, dy)`.
pub(crate) fn shifted(marks: Vec<Mark>, dx: f64, dy: f64) -> Vec<Mark> {
    marks
        .into_iter()
        .map(|mut m| {
            m.shape.translate(dx, dy);
            m
        })
        .collect()
}

/// Prefix every key so marks from several builders can share a layer.
pub(crate) fn prefixed(marks: Vec<Mark>, prefix: &str) -> Vec<Mark> {
    marks
        .into_iter()
        .map(|mut m| {
            m.key = format!("{prefix}-{}", m.key).into();
            m
        })
        .collect()
}

/// Official-game colors of the eighteen primary types.
pub fn pokemon_type_colors() -> Vec<(String, Rgba)> {
    [
        ("Normal", Rgba::rgb(0xA8, 0xA8, 0x78)),
        ("Fire", Rgba::rgb(0xF0, 0x80, 0x30)),
        ("Water", Rgba::rgb(0x68, 0x90, 0xF0)),
        ("Grass", Rgba::rgb(0x78, 0xC8, 0x50)),
        ("Electric", Rgba::rgb(0xF8, 0xD0, 0x30)),
        ("Ice", Rgba::rgb(0x98, 0xD8, 0xD8)),
        ("Fighting", Rgba::rgb(0xC0, 0x30, 0x28)),
        ("Poison", Rgba::rgb(0xA0, 0x40, 0xA0)),
        ("Ground", Rgba::rgb(0xE0, 0xC0, 0x68)),
        ("Flying", Rgba::rgb(0xA8, 0x90, 0xF0)),
        ("Psychic", Rgba::rgb(0xF8, 0x58, 0x88)),
        ("Bug", Rgba::rgb(0xA8, 0xB8, 0x20)),
        ("Rock", Rgba::rgb(0xB8, 0xA0, 0x38)),
        ("Ghost", Rgba::rgb(0x70, 0x58, 0x98)),
        ("Dragon", Rgba::rgb(0x70, 0x38, 0xF8)),
        ("Dark", Rgba::rgb(0x70, 0x58, 0x48)),
        ("Steel", Rgba::rgb(0xB8, 0xB8, 0xD0)),
        ("Fairy", Rgba::rgb(0xF0, 0xB6, 0xBC)),
    ]
    .into_iter()
    .map(|(name, c)| (name.to_string(), c))
    .collect()
}
