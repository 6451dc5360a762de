// File: crates/tabula-render-skia/src/text.rs
// Summary: Text shaping for text marks via Skia textlayout: anchored, bold and rotated labels.

use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextStyle};
use skia_safe as skia;
use tabula_core::mark::{Anchor, Font};

const FAMILIES: [&str; 6] = ["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"];

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn layout(&self, text: &str, font: &Font, paint: &skia::Paint) -> Paragraph {
        let mut style = TextStyle::new();
        style.set_font_size((font.size as f32).max(1.0));
        style.set_foreground_paint(paint);
        style.set_font_families(&FAMILIES);
        if font.bold {
            style.set_font_style(skia::FontStyle::bold());
        }
        let pstyle = ParagraphStyle::new();
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, font: &Font) -> f32 {
        self.layout(text, font, &skia::Paint::default()).longest_line()
    }

    /// Draw with `(x, y)` as the baseline point, aligned by the font's anchor and
    /// rotated around that point.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, (x, y): (f32, f32), font: &Font, paint: &skia::Paint) {
        let p = self.layout(text, font, paint);
        let width = p.longest_line();
        let dx = match font.anchor {
            Anchor::Start => 0.0,
            Anchor::Middle => -width * 0.5,
            Anchor::End => -width,
        };
        // paragraphs paint from the top-left; shift up to the alphabetic baseline
        let dy = -p.alphabetic_baseline();
        canvas.save();
        canvas.translate((x, y));
        if font.rotate != 0.0 {
            canvas.rotate(font.rotate as f32, None);
        }
        p.paint(canvas, (dx, dy));
        canvas.restore();
    }
}
