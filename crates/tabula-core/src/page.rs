// File: crates/tabula-core/src/page.rs
// Summary: Static HTML page embedding several rendered canvases, one section per chart.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::info;

use crate::canvas::Canvas;
use crate::error::Result;

const INDEX_FILE_NAME: &str = "index.html";

#[derive(Serialize)]
struct Section {
    name: String,
    svg: String,
}

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    charts: &'a [Section],
}

/// Collects rendered charts and writes them as `index.html` plus one `<name>.svg` each.
pub struct Page {
    title: String,
    sections: Vec<Section>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), sections: Vec::new() }
    }

    /// Snapshot `canvas` as it is now under `name`.
    pub fn push(&mut self, name: impl Into<String>, canvas: &Canvas) {
        self.sections.push(Section { name: name.into(), svg: canvas.to_svg() });
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self) -> Result<String> {
        let mut template = TinyTemplate::new();
        template.add_template("index", include_str!("./template/index.html.tt"))?;
        let text = template.render("index", &Context { title: &self.title, charts: &self.sections })?;
        Ok(text)
    }

    /// Write `index.html` and every chart's SVG into `dir`, creating it if needed.
    /// Returns the path of the index file.
    pub fn write(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        for section in &self.sections {
            fs::write(dir.join(format!("{}.svg", section.name)), &section.svg)?;
        }
        let index = dir.join(INDEX_FILE_NAME);
        fs::write(&index, self.render()?)?;
        info!(path = %index.display(), charts = self.sections.len(), "page written");
        Ok(index)
    }
}
