// File: crates/tabula-core/src/text.rs
// Summary: Approximate text metrics for layout without a font backend (width estimate, word wrap).

/// Average advance of a sans-serif glyph as a fraction of the font size.
const AVG_ADVANCE: f64 = 0.55;

/// Estimated rendered width of `text` at `size` pixels.
pub fn approx_width(text: &str, size: f64) -> f64 {
    text.chars()
        .map(|c| match c {
            'i' | 'l' | 'j' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.28,
            'f' | 't' | 'r' | ' ' | '(' | ')' | '-' => 0.36,
            'm' | 'w' | 'M' | 'W' => 0.85,
            c if c.is_ascii_uppercase() => 0.68,
            _ => AVG_ADVANCE,
        })
        .sum::<f64>()
        * size
}

/// Greedy word wrap so each line fits in `max_width` pixels. A single word wider
/// than the limit gets a line of its own.
pub fn wrap(text: &str, size: f64, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
        if !line.is_empty() && approx_width(&candidate, size) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
