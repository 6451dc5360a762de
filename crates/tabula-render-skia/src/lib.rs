// File: crates/tabula-render-skia/src/lib.rs
// Summary: Raster backend entry points. The Skia painter is compiled only with the `skia` feature.

use std::path::Path;

use anyhow::Result;
use tabula_core::Canvas;

#[cfg(feature = "skia")]
mod raster;
#[cfg(feature = "skia")]
mod text;

#[cfg(feature = "skia")]
pub use raster::SkiaRenderer;
#[cfg(feature = "skia")]
pub use text::TextShaper;

/// Rasterize `canvas` to PNG bytes at its own size.
#[cfg(feature = "skia")]
pub fn render_png(canvas: &Canvas) -> Result<Vec<u8>> {
    SkiaRenderer::new().render_png(canvas)
}

#[cfg(not(feature = "skia"))]
pub fn render_png(_canvas: &Canvas) -> Result<Vec<u8>> {
    anyhow::bail!("PNG output needs tabula-render-skia built with the `skia` feature")
}

/// Rasterize and write to `path`, creating parent directories.
pub fn write_png(canvas: &Canvas, path: impl AsRef<Path>) -> Result<()> {
    let bytes = render_png(canvas)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(all(test, not(feature = "skia")))]
mod tests {
    use super::*;
    use tabula_core::Theme;

    #[test]
    fn without_skia_png_output_is_an_error() {
        let canvas = Canvas::new(10, 10, Theme::light());
        let err = render_png(&canvas).unwrap_err();
        assert!(err.to_string().contains("skia"));
    }
}
