// File: crates/tabula-core/src/legend.rs
// Summary: Legend builders (category swatches, size samples, color gradient with its own axis).

use crate::axis::{Axis, Orientation};
use crate::canvas::{Canvas, LinearGradient};
use crate::color::Rgba;
use crate::error::Result;
use crate::grid::linspace;
use crate::mark::{Anchor, Font, Mark, Paint, Shape, Style};
use crate::scale::{LinearScale, Scale, SequentialScale};
use crate::theme::Theme;

const ROW: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Swatch {
    Circle,
    Square,
}

fn title_mark(title: &str, x: f64, y: f64, theme: &Theme) -> Mark {
    Mark::new(Shape::text(x, y, title, Font::sized(12.0).bold()), Style::fill(theme.text))
        .keyed("legend-title")
        .with_class("legend")
}

/// One row per `(label, color)`, 20px apart, starting at the layer origin.
pub fn ordinal(entries: &[(String, Rgba)], title: Option<&str>, swatch: Swatch, theme: &Theme) -> Vec<Mark> {
    let mut out = Vec::with_capacity(entries.len() * 2 + 1);
    if let Some(t) = title {
        out.push(title_mark(t, -10.0, -10.0, theme));
    }
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = i as f64 * ROW;
        let shape = match swatch {
            Swatch::Circle => Shape::Circle { cx: 0.0, cy: y, r: 6.0 },
            Swatch::Square => Shape::Rect { x: -6.0, y: y - 6.0, width: 12.0, height: 12.0 },
        };
        let style = Style::fill(*color).with_stroke(Rgba::rgb(0x33, 0x33, 0x33), 0.5).with_opacity(0.8);
        out.push(Mark::new(shape, style).keyed(format!("legend-swatch-{i}")).with_class("legend"));
        out.push(
            Mark::new(Shape::text(15.0, y + 4.0, label, Font::sized(12.0)), Style::fill(theme.text))
                .keyed(format!("legend-label-{i}"))
                .with_class("legend"),
        );
    }
    out
}

/// Sample circles for a size encoding: `(label, radius)` pairs stacked vertically.
pub fn size(samples: &[(String, f64)], title: Option<&str>, theme: &Theme) -> Vec<Mark> {
    let mut out = Vec::with_capacity(samples.len() * 2 + 1);
    if let Some(t) = title {
        out.push(title_mark(t, -10.0, -10.0, theme));
    }
    let mut y = 0.0;
    for (i, (label, r)) in samples.iter().enumerate() {
        y += r;
        out.push(
            Mark::new(Shape::Circle { cx: 0.0, cy: y, r: *r }, Style::stroke(theme.tick, 1.0))
                .keyed(format!("legend-size-{i}"))
                .with_class("legend"),
        );
        out.push(
            Mark::new(Shape::text(24.0, y + 4.0, label, Font::sized(11.0)), Style::fill(theme.text))
                .keyed(format!("legend-size-label-{i}"))
                .with_class("legend"),
        );
        y += r + 8.0;
    }
    out
}

/// Horizontal gradient bar of `width × height` for `scale`, a title above it and a
/// bottom axis with about `ticks` ticks. Registers gradient `id` on the canvas.
pub fn gradient(
    canvas: &mut Canvas,
    id: &str,
    scale: &SequentialScale,
    title: &str,
    (width, height): (f64, f64),
    ticks: usize,
) -> Result<Vec<Mark>> {
    let (d0, d1) = scale.domain();
    let stops = scale.ramp().stops().len().max(2);
    let gradient = LinearGradient {
        id: id.to_string(),
        stops: linspace(0.0, 1.0, stops)
            .into_iter()
            .map(|t| (t, scale.map(d0 + t * (d1 - d0))))
            .collect(),
    };
    canvas.add_gradient(gradient);

    let theme = *canvas.theme();
    let mut out = vec![
        Mark::new(
            Shape::Rect { x: 0.0, y: 0.0, width, height },
            Style::fill(Paint::Gradient(id.to_string())),
        )
        .keyed("legend-gradient")
        .with_class("legend"),
        Mark::new(
            Shape::text(width * 0.5, -5.0, title, Font::sized(12.0).anchor(Anchor::Middle)),
            Style::fill(theme.text),
        )
        .keyed("legend-title")
        .with_class("legend"),
    ];
    let axis = Axis::from_scale(&Scale::Linear(LinearScale::new((d0, d1), (0.0, width))), "", Orientation::Bottom, ticks)?;
    out.extend(axis.marks(&theme, height).into_iter().map(|mut m| {
        m.key = format!("legend-{}", m.key).into();
        m
    }));
    Ok(out)
}
