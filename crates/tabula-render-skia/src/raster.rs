// File: crates/tabula-render-skia/src/raster.rs
// Summary: Paints a tabula-core canvas onto a Skia CPU raster surface and encodes it as PNG.

use anyhow::{anyhow, Result};
use skia_safe as skia;
use tabula_core::canvas::Layer;
use tabula_core::color::Rgba;
use tabula_core::mark::{Mark, Paint, Shape, Style};
use tabula_core::Canvas;
use tracing::debug;

use crate::text::TextShaper;

fn color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

/// Rasterizes canvases. Holds the font collection so repeated renders share it.
#[derive(Default)]
pub struct SkiaRenderer {
    text: TextShaper,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { text: TextShaper::new() }
    }

    /// Render to PNG bytes at the canvas's own size.
    pub fn render_png(&self, canvas: &Canvas) -> Result<Vec<u8>> {
        let mut surface = skia::surfaces::raster_n32_premul((canvas.width() as i32, canvas.height() as i32))
            .ok_or_else(|| anyhow!("failed to create raster surface"))?;
        let target = surface.canvas();
        target.clear(color(canvas.background()));

        for layer in canvas.layers() {
            self.draw_layer(target, canvas, layer);
        }

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        debug!(width = canvas.width(), height = canvas.height(), bytes = data.as_bytes().len(), "rasterized canvas");
        Ok(data.as_bytes().to_vec())
    }

    fn draw_layer(&self, target: &skia::Canvas, canvas: &Canvas, layer: &Layer) {
        target.save();
        target.translate((layer.origin.0 as f32, layer.origin.1 as f32));
        for mark in &layer.marks {
            self.draw_mark(target, canvas, mark);
        }
        target.restore();
    }

    fn draw_mark(&self, target: &skia::Canvas, canvas: &Canvas, mark: &Mark) {
        let (shape, style) = mark.appearance();
        let bounds = bounds(&shape);
        let fill = paint_for(canvas, &style.fill, &style, bounds, skia::paint::Style::Fill);
        let stroke = paint_for(canvas, &style.stroke, &style, bounds, skia::paint::Style::Stroke);

        match &shape {
            Shape::Circle { cx, cy, r } => {
                for p in [&fill, &stroke].into_iter().flatten() {
                    target.draw_circle((*cx as f32, *cy as f32), *r as f32, p);
                }
            }
            Shape::Rect { x, y, width, height } => {
                let rect = skia::Rect::from_xywh(*x as f32, *y as f32, width.max(0.0) as f32, height.max(0.0) as f32);
                for p in [&fill, &stroke].into_iter().flatten() {
                    target.draw_rect(rect, p);
                }
            }
            Shape::Line { x1, y1, x2, y2 } => {
                if let Some(p) = &stroke {
                    target.draw_line((*x1 as f32, *y1 as f32), (*x2 as f32, *y2 as f32), p);
                }
            }
            Shape::Path { points, closed } => {
                let path = path_of(points, *closed);
                for p in [&fill, &stroke].into_iter().flatten() {
                    target.draw_path(&path, p);
                }
            }
            Shape::Text { x, y, content, font } => {
                if let Some(p) = &fill {
                    self.text.draw(target, content, (*x as f32, *y as f32), font, p);
                }
            }
        }
    }
}

/// Skia paint for one side (fill or stroke) of a mark; `None` when that side is unpainted.
fn paint_for(canvas: &Canvas, p: &Paint, style: &Style, bounds: skia::Rect, kind: skia::paint::Style) -> Option<skia::Paint> {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(kind);
    if kind == skia::paint::Style::Stroke {
        paint.set_stroke_width(style.stroke_width as f32);
    }
    match p {
        Paint::None => return None,
        Paint::Solid(c) => {
            paint.set_color(color(*c));
            paint.set_alpha_f(c.opacity() as f32 * style.opacity as f32);
        }
        Paint::Gradient(id) => {
            let gradient = canvas.gradients().iter().find(|g| &g.id == id)?;
            let colors: Vec<skia::Color> = gradient.stops.iter().map(|(_, c)| color(*c)).collect();
            let offsets: Vec<f32> = gradient.stops.iter().map(|(o, _)| *o as f32).collect();
            // horizontal across the shape's bounding box
            let shader = skia::Shader::linear_gradient(
                ((bounds.left, bounds.top), (bounds.right, bounds.top)),
                colors.as_slice(),
                offsets.as_slice(),
                skia::TileMode::Clamp,
                None,
                None,
            )?;
            paint.set_shader(shader);
            paint.set_alpha_f(style.opacity as f32);
        }
    }
    Some(paint)
}

fn bounds(shape: &Shape) -> skia::Rect {
    match shape {
        Shape::Rect { x, y, width, height } => skia::Rect::from_xywh(*x as f32, *y as f32, *width as f32, *height as f32),
        Shape::Circle { cx, cy, r } => skia::Rect::from_ltrb((cx - r) as f32, (cy - r) as f32, (cx + r) as f32, (cy + r) as f32),
        _ => {
            let (x, y) = shape.anchor();
            skia::Rect::from_xywh(x as f32, y as f32, 1.0, 1.0)
        }
    }
}

/// Polyline split at NaN coordinates; only an unbroken outline is closed.
fn path_of(points: &[(f64, f64)], closed: bool) -> skia::Path {
    let runs = Shape::segments(points);
    let mut path = skia::Path::new();
    for run in &runs {
        for (i, (x, y)) in run.iter().enumerate() {
            if i == 0 {
                path.move_to((*x as f32, *y as f32));
            } else {
                path.line_to((*x as f32, *y as f32));
            }
        }
    }
    if closed && runs.len() == 1 {
        path.close();
    }
    path
}
