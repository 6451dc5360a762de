// File: crates/tabula-core/src/svg.rs
// Summary: Serializes a canvas (layers, marks, gradients) to a standalone SVG document.

use std::fmt::Write as _;

use crate::canvas::Canvas;
use crate::mark::{Anchor, Mark, Paint, Shape, Style};

/// Coordinates rounded to 2 decimals with trailing zeros dropped, so output is stable.
fn num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    let r = if r == 0.0 { 0.0 } else { r };
    let s = format!("{r:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn paint(p: &Paint) -> (String, Option<f64>) {
    match p {
        Paint::None => ("none".to_string(), None),
        Paint::Solid(c) => (c.to_hex(), (c.a < 255).then(|| c.opacity())),
        Paint::Gradient(id) => (format!("url(#{id})"), None),
    }
}

fn style_attrs(out: &mut String, style: &Style) {
    let (fill, fill_opacity) = paint(&style.fill);
    let _ = write!(out, r#" fill="{fill}""#);
    if let Some(o) = fill_opacity {
        let _ = write!(out, r#" fill-opacity="{}""#, num(o));
    }
    if style.stroke != Paint::None {
        let (stroke, stroke_opacity) = paint(&style.stroke);
        let _ = write!(out, r#" stroke="{stroke}" stroke-width="{}""#, num(style.stroke_width));
        if let Some(o) = stroke_opacity {
            let _ = write!(out, r#" stroke-opacity="{}""#, num(o));
        }
    }
    if style.opacity != 1.0 {
        let _ = write!(out, r#" opacity="{}""#, num(style.opacity));
    }
}

fn path_data(points: &[(f64, f64)], closed: bool) -> String {
    let runs = Shape::segments(points);
    let mut d = String::new();
    for run in &runs {
        for (i, (x, y)) in run.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", num(*x), num(*y));
        }
    }
    // a broken outline cannot be closed
    if closed && runs.len() == 1 {
        d.push('Z');
    }
    d
}

fn write_mark(out: &mut String, mark: &Mark) {
    let (shape, style) = mark.appearance();
    let mut attrs = String::new();
    if !mark.key.as_str().is_empty() {
        let _ = write!(attrs, r#" data-key="{}""#, escape(mark.key.as_str()));
    }
    if let Some(class) = &mark.class {
        let _ = write!(attrs, r#" class="{}""#, escape(class));
    }

    let (open, body) = match &shape {
        Shape::Circle { cx, cy, r } => (format!(r#"<circle cx="{}" cy="{}" r="{}""#, num(*cx), num(*cy), num(*r)), None),
        Shape::Rect { x, y, width, height } => (
            format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                num(*x),
                num(*y),
                num(width.max(0.0)),
                num(height.max(0.0))
            ),
            None,
        ),
        Shape::Line { x1, y1, x2, y2 } => (
            format!(r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#, num(*x1), num(*y1), num(*x2), num(*y2)),
            None,
        ),
        Shape::Path { points, closed } => (format!(r#"<path d="{}""#, path_data(points, *closed)), None),
        Shape::Text { x, y, content, font } => {
            let anchor = match font.anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let mut open = format!(
                r#"<text x="{}" y="{}" text-anchor="{anchor}" font-size="{}""#,
                num(*x),
                num(*y),
                num(font.size)
            );
            if font.bold {
                open.push_str(r#" font-weight="bold""#);
            }
            if font.rotate != 0.0 {
                let _ = write!(open, r#" transform="rotate({} {} {})""#, num(font.rotate), num(*x), num(*y));
            }
            (open, Some(escape(content)))
        }
    };

    out.push_str(&open);
    out.push_str(&attrs);
    style_attrs(out, &style);
    match (body, &mark.title) {
        (None, None) => out.push_str("/>\n"),
        (body, title) => {
            out.push('>');
            if let Some(t) = title {
                let _ = write!(out, "<title>{}</title>", escape(t));
            }
            if let Some(b) = body {
                out.push_str(&b);
            }
            let tag = open.trim_start_matches('<').split(' ').next().unwrap_or("g");
            let _ = writeln!(out, "</{tag}>");
        }
    }
}

pub fn to_svg(canvas: &Canvas) -> String {
    let (w, h) = (canvas.width(), canvas.height());
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#
    );
    let _ = writeln!(out, r#"<rect width="{w}" height="{h}" fill="{}"/>"#, canvas.background().to_hex());

    if !canvas.gradients().is_empty() {
        out.push_str("<defs>\n");
        for g in canvas.gradients() {
            let _ = writeln!(out, r#"<linearGradient id="{}" x1="0%" y1="0%" x2="100%" y2="0%">"#, escape(&g.id));
            for (offset, color) in &g.stops {
                let _ = writeln!(out, r#"<stop offset="{}%" stop-color="{}"/>"#, num(offset * 100.0), color.to_hex());
            }
            out.push_str("</linearGradient>\n");
        }
        out.push_str("</defs>\n");
    }

    for layer in canvas.layers() {
        if layer.marks.is_empty() {
            continue;
        }
        let (x, y) = layer.origin;
        let _ = writeln!(
            out,
            r#"<g data-layer="{}" transform="translate({},{})">"#,
            escape(&layer.name),
            num(x),
            num(y)
        );
        for mark in &layer.marks {
            write_mark(&mut out, mark);
        }
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}
