// File: crates/tabula-core/src/canvas.rs
// Summary: Fixed-size drawing surface holding named layers of marks and gradient definitions.

use std::path::Path;

use tracing::error;

use crate::color::Rgba;
use crate::error::Result;
use crate::mark::{Anchor, Font, Mark, MarkKey, Shape, Style};
use crate::svg;
use crate::theme::Theme;
use crate::types::{Insets, RenderOptions};

/// Index of a layer on the canvas that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(usize);

/// A group of marks translated by `origin`.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub name: String,
    pub origin: (f64, f64),
    pub marks: Vec<Mark>,
}

impl Layer {
    pub fn find(&self, key: &MarkKey) -> Option<&Mark> {
        self.marks.iter().find(|m| &m.key == key)
    }

    pub fn find_mut(&mut self, key: &MarkKey) -> Option<&mut Mark> {
        self.marks.iter_mut().find(|m| &m.key == key)
    }
}

/// Horizontal linear gradient, referenced from a [`crate::mark::Paint::Gradient`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub id: String,
    /// `(offset in [0, 1], color)`
    pub stops: Vec<(f64, Rgba)>,
}

/// The drawing surface. Its size is fixed by whoever creates it; charts only draw into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    theme: Theme,
    insets: Insets,
    layers: Vec<Layer>,
    gradients: Vec<LinearGradient>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, theme: Theme) -> Self {
        let insets = RenderOptions::default().insets;
        Self { width, height, theme, insets, layers: Vec::new(), gradients: Vec::new() }
    }

    pub fn from_options(opts: &RenderOptions) -> Self {
        Self::new(opts.width, opts.height, opts.theme).with_insets(opts.insets)
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Plot margins for charts that do not set their own.
    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn background(&self) -> Rgba {
        self.theme.background
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn gradients(&self) -> &[LinearGradient] {
        &self.gradients
    }

    /// Append a layer drawn above all existing ones.
    pub fn add_layer(&mut self, name: impl Into<String>, origin: (f64, f64)) -> LayerId {
        self.layers.push(Layer { name: name.into(), origin, marks: Vec::new() });
        LayerId(self.layers.len() - 1)
    }

    /// Panics if `id` was not issued by this canvas.
    pub fn layer(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }

    /// Panics if `id` was not issued by this canvas.
    pub fn layer_mut(&mut self, id: LayerId) -> &mut Layer {
        &mut self.layers[id.0]
    }

    pub fn clear_layer(&mut self, id: LayerId) {
        self.layer_mut(id).marks.clear();
    }

    pub fn push(&mut self, id: LayerId, mark: Mark) {
        self.layer_mut(id).marks.push(mark);
    }

    pub fn extend(&mut self, id: LayerId, marks: impl IntoIterator<Item = Mark>) {
        self.layer_mut(id).marks.extend(marks);
    }

    pub fn find_mark(&self, id: LayerId, key: &MarkKey) -> Option<&Mark> {
        self.layer(id).find(key)
    }

    /// Register a gradient; an existing one with the same id is replaced.
    pub fn add_gradient(&mut self, gradient: LinearGradient) {
        self.gradients.retain(|g| g.id != gradient.id);
        self.gradients.push(gradient);
    }

    pub fn mark_count(&self) -> usize {
        self.layers.iter().map(|l| l.marks.len()).sum()
    }

    /// Drop everything drawn so far and show `message` centered in the error color.
    /// Layer ids stay valid but their layers are empty.
    pub fn show_error(&mut self, message: &str) {
        error!(message, "chart replaced by error message");
        for layer in &mut self.layers {
            layer.marks.clear();
        }
        self.gradients.clear();
        let (cx, cy) = (self.width as f64 * 0.5, self.height as f64 * 0.5);
        let text = Mark::new(
            Shape::text(cx, cy, message, Font::sized(16.0).anchor(Anchor::Middle)),
            Style::fill(self.theme.error),
        )
        .keyed("error")
        .with_class("error");
        let id = self.add_layer("error", (0.0, 0.0));
        self.push(id, text);
    }

    pub fn to_svg(&self) -> String {
        svg::to_svg(self)
    }

    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_svg())?;
        Ok(())
    }
}
