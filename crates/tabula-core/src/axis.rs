// File: crates/tabula-core/src/axis.rs
// Summary: Axis model derived from a bound scale: tick offsets, labels and the marks that draw them.

use crate::error::{ChartError, Result};
use crate::mark::{Anchor, Font, Mark, Shape, Style};
use crate::scale::{tick_step, Scale, ScaleKind, ScaleTransform};
use crate::theme::Theme;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel offset along the axis.
    pub offset: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub label: String,
    pub orientation: Orientation,
    pub ticks: Vec<Tick>,
    pub range: (f64, f64),
    /// Distance from the axis line to the axis title.
    pub title_offset: f64,
    pub font_size: f64,
}

impl Axis {
    /// Ticks for a positional scale. Linear scales get about `count` round ticks;
    /// band and point scales get one tick per category.
    pub fn from_scale(scale: &Scale, label: impl Into<String>, orientation: Orientation, count: usize) -> Result<Self> {
        let (ticks, range) = match scale {
            Scale::Linear(s) => {
                let (d0, d1) = s.domain();
                let step = tick_step(d0, d1, count);
                let ticks = s
                    .ticks(count)
                    .into_iter()
                    .map(|v| Tick { offset: s.map(v), label: format_tick(v, step) })
                    .collect();
                (ticks, s.range())
            }
            Scale::Band(s) => {
                let ticks = s
                    .domain()
                    .iter()
                    .filter_map(|c| s.center(c).map(|offset| Tick { offset, label: c.clone() }))
                    .collect();
                (ticks, s.range())
            }
            Scale::Point(s) => {
                let ticks = s
                    .domain()
                    .iter()
                    .filter_map(|c| s.map(c).map(|offset| Tick { offset, label: c.clone() }))
                    .collect();
                (ticks, s.range())
            }
            Scale::Sequential(_) => {
                return Err(ChartError::DomainMismatch { kind: ScaleKind::Sequential, expected: "positional" });
            }
        };
        let title_offset = match orientation {
            Orientation::Bottom => 40.0,
            Orientation::Left => 45.0,
        };
        Ok(Self { label: label.into(), orientation, ticks, range, title_offset, font_size: 10.0 })
    }

    /// Rewrite every tick label, e.g. `"1"` to `"Gen 1"`.
    pub fn map_labels(mut self, f: impl Fn(&str) -> String) -> Self {
        for t in &mut self.ticks {
            t.label = f(&t.label);
        }
        self
    }

    pub fn with_title_offset(mut self, offset: f64) -> Self {
        self.title_offset = offset;
        self
    }

    /// Domain line, tick lines, tick labels and title. `at` is the axis position
    /// on the cross axis (plot height for a bottom axis, 0 for a left axis).
    pub fn marks(&self, theme: &Theme, at: f64) -> Vec<Mark> {
        let line = Style::stroke(theme.axis_line, 1.0);
        let label_style = Style::fill(theme.tick);
        let font = Font::sized(self.font_size);
        let (r0, r1) = self.range;
        let mut out = Vec::with_capacity(self.ticks.len() * 2 + 2);

        let domain = match self.orientation {
            Orientation::Bottom => Shape::Line { x1: r0, y1: at, x2: r1, y2: at },
            Orientation::Left => Shape::Line { x1: at, y1: r0, x2: at, y2: r1 },
        };
        out.push(Mark::new(domain, line.clone()).keyed("domain").with_class("axis"));

        for (i, tick) in self.ticks.iter().enumerate() {
            let (mark, text) = match self.orientation {
                Orientation::Bottom => (
                    Shape::Line { x1: tick.offset, y1: at, x2: tick.offset, y2: at + TICK_SIZE },
                    Shape::text(
                        tick.offset,
                        at + TICK_SIZE + TICK_PADDING + self.font_size,
                        &tick.label,
                        font.anchor(Anchor::Middle),
                    ),
                ),
                Orientation::Left => (
                    Shape::Line { x1: at - TICK_SIZE, y1: tick.offset, x2: at, y2: tick.offset },
                    Shape::text(
                        at - TICK_SIZE - TICK_PADDING,
                        tick.offset + self.font_size * 0.32,
                        &tick.label,
                        font.anchor(Anchor::End),
                    ),
                ),
            };
            out.push(Mark::new(mark, line.clone()).keyed(format!("tick-{i}")).with_class("axis"));
            out.push(Mark::new(text, label_style.clone()).keyed(format!("tick-label-{i}")).with_class("axis"));
        }

        if !self.label.is_empty() {
            let mid = (r0 + r1) * 0.5;
            let title = match self.orientation {
                Orientation::Bottom => {
                    Shape::text(mid, at + self.title_offset, &self.label, Font::sized(12.0).anchor(Anchor::Middle))
                }
                Orientation::Left => Shape::text(
                    at - self.title_offset,
                    mid,
                    &self.label,
                    Font::sized(12.0).anchor(Anchor::Middle).rotate(-90.0),
                ),
            };
            out.push(Mark::new(title, Style::fill(theme.axis_label)).keyed("title").with_class("axis-title"));
        }
        out
    }

    /// Light lines across the plot at every tick; `length` is the plot extent on the cross axis.
    pub fn grid_lines(&self, theme: &Theme, length: f64) -> Vec<Mark> {
        let style = Style::stroke(theme.grid, 1.0);
        self.ticks
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let shape = match self.orientation {
                    Orientation::Bottom => Shape::Line { x1: t.offset, y1: 0.0, x2: t.offset, y2: length },
                    Orientation::Left => Shape::Line { x1: 0.0, y1: t.offset, x2: length, y2: t.offset },
                };
                Mark::new(shape, style.clone()).keyed(format!("grid-{i}")).with_class("grid")
            })
            .collect()
    }
}

/// Decimal places implied by the tick step, so 0.5-steps print "2.5" and 5-steps print "25".
pub fn format_tick(value: f64, step: f64) -> String {
    let precision = if step > 0.0 && step.is_finite() { (-step.log10().floor()).max(0.0) as usize } else { 0 };
    let s = format!("{value:.precision$}");
    // avoid "-0"
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}
