// File: crates/tabula-core/src/mark.rs
// Summary: Visual marks (shapes + style), identity keys and the emphasis overlay.

use std::fmt;

use crate::color::Rgba;
use crate::record::RecordId;

/// Stable identity of a mark across data updates.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkKey(String);

impl MarkKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join parts with `|`. A `|` or `\` inside a part is escaped with `\`, so distinct
    /// part lists never produce the same key.
    pub fn compound<S: AsRef<str>>(parts: &[S]) -> Self {
        let mut key = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                key.push('|');
            }
            for c in part.as_ref().chars() {
                if matches!(c, '|' | '\\') {
                    key.push('\\');
                }
                key.push(c);
            }
        }
        Self(key)
    }

    /// Inverse of [`MarkKey::compound`].
    pub fn parts(&self) -> Vec<String> {
        let mut parts = vec![String::new()];
        let mut chars = self.0.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let (Some(next), Some(last)) = (chars.next(), parts.last_mut()) {
                        last.push(next);
                    }
                }
                '|' => parts.push(String::new()),
                c => {
                    if let Some(last) = parts.last_mut() {
                        last.push(c);
                    }
                }
            }
        }
        parts
    }
}

impl From<RecordId> for MarkKey {
    fn from(id: RecordId) -> Self {
        Self(id.0.to_string())
    }
}

impl From<&str> for MarkKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MarkKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for MarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub size: f64,
    pub anchor: Anchor,
    pub bold: bool,
    /// Rotation in degrees around the text origin.
    pub rotate: f64,
}

impl Default for Font {
    fn default() -> Self {
        Self { size: 12.0, anchor: Anchor::Start, bold: false, rotate: 0.0 }
    }
}

impl Font {
    pub fn sized(size: f64) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f64) -> Self {
        self.rotate = degrees;
        self
    }
}

/// Geometry of a mark in its layer's coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Polyline or polygon. A NaN coordinate breaks the path; drawing resumes
    /// at the next defined point.
    Path { points: Vec<(f64, f64)>, closed: bool },
    Text { x: f64, y: f64, content: String, font: Font },
}

impl Shape {
    pub fn text(x: f64, y: f64, content: impl Into<String>, font: Font) -> Self {
        Shape::Text { x, y, content: content.into(), font }
    }

    /// Defined runs of a path, each with at least one point.
    pub fn segments(points: &[(f64, f64)]) -> Vec<&[(f64, f64)]> {
        points
            .split(|(x, y)| x.is_nan() || y.is_nan())
            .filter(|run| !run.is_empty())
            .collect()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Circle { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
            Shape::Rect { x, y, .. } | Shape::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Shape::Line { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
            Shape::Path { points, .. } => {
                for (x, y) in points {
                    *x += dx;
                    *y += dy;
                }
            }
        }
    }

    /// Anchor point used to place annotations and tooltips.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Shape::Circle { cx, cy, .. } => (*cx, *cy),
            Shape::Rect { x, y, width, .. } => (x + width * 0.5, *y),
            Shape::Line { x1, y1, .. } => (*x1, *y1),
            Shape::Path { points, .. } => points
                .iter()
                .copied()
                .find(|(x, y)| !x.is_nan() && !y.is_nan())
                .unwrap_or((0.0, 0.0)),
            Shape::Text { x, y, .. } => (*x, *y),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Paint {
    #[default]
    None,
    Solid(Rgba),
    /// Reference to a gradient registered on the canvas.
    Gradient(String),
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: Paint::None, stroke: Paint::None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    pub fn fill(color: impl Into<Paint>) -> Self {
        Self { fill: color.into(), ..Self::default() }
    }

    pub fn stroke(color: impl Into<Paint>, width: f64) -> Self {
        Self { stroke: color.into(), stroke_width: width, ..Self::default() }
    }

    pub fn with_stroke(mut self, color: impl Into<Paint>, width: f64) -> Self {
        self.stroke = color.into();
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Overlay applied on top of a mark's base style. Removing it restores the
/// base appearance exactly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Emphasis {
    /// Added to a circle's radius.
    pub grow: f64,
    pub stroke: Option<Rgba>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

impl Emphasis {
    /// Clicked point: larger, opaque, outlined.
    pub fn selected(outline: Rgba) -> Self {
        Self { grow: 3.0, stroke: Some(outline), stroke_width: Some(2.0), opacity: Some(1.0) }
    }

    /// Point under the pointer.
    pub fn hovered() -> Self {
        Self { grow: 2.0, opacity: Some(1.0), ..Self::default() }
    }

    /// Line under the pointer: thicker and opaque.
    pub fn highlighted_line() -> Self {
        Self { stroke_width: Some(3.0), opacity: Some(1.0), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub key: MarkKey,
    pub shape: Shape,
    pub style: Style,
    /// Hover text (SVG `<title>`).
    pub title: Option<String>,
    pub class: Option<String>,
    pub emphasis: Option<Emphasis>,
}

impl Mark {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self { key: MarkKey::default(), shape, style, title: None, class: None, emphasis: None }
    }

    pub fn keyed(mut self, key: impl Into<MarkKey>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn is_emphasized(&self) -> bool {
        self.emphasis.is_some()
    }

    /// Shape and style with the emphasis overlay resolved.
    pub fn appearance(&self) -> (Shape, Style) {
        let Some(e) = &self.emphasis else {
            return (self.shape.clone(), self.style.clone());
        };
        let shape = match &self.shape {
            Shape::Circle { cx, cy, r } => Shape::Circle { cx: *cx, cy: *cy, r: r + e.grow },
            other => other.clone(),
        };
        let mut style = self.style.clone();
        if let Some(stroke) = e.stroke {
            style.stroke = Paint::Solid(stroke);
        }
        if let Some(width) = e.stroke_width {
            style.stroke_width = width;
        }
        if let Some(opacity) = e.opacity {
            style.opacity = opacity;
        }
        (shape, style)
    }
}
