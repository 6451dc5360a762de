// File: crates/tabula-core/src/config.rs
// Summary: JSON dashboard description (datasets, charts, replayed UI events) and the
// renderer that turns it into canvases, isolating failures per chart.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::canvas::Canvas;
use crate::charts::{Bar, BarConfig, Heatmap, HeatmapConfig, Parallel, ParallelConfig, Radar, RadarConfig, Scatter, ScatterConfig};
use crate::context::DataContext;
use crate::error::{LoadError, Result};
use crate::interaction::{Controller, Effect};
use crate::loader::Loader;
use crate::page::Page;
use crate::schema::Schema;
use crate::types::RenderOptions;

/// Shown in place of a chart whose dataset could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading data";
/// Shown in place of a chart that could not be built from its dataset.
pub const RENDER_ERROR_MESSAGE: &str = "Error rendering chart";

#[derive(Clone, Debug, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub title: String,
    /// Defaults for every chart; a chart may override them.
    #[serde(default)]
    pub options: RenderOptions,
    pub datasets: Vec<DatasetConfig>,
    pub charts: Vec<ChartConfig>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    /// Relative paths resolve against the config file's directory.
    pub path: PathBuf,
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub delimiter: Option<char>,
}

impl DatasetConfig {
    pub fn loader(&self) -> Loader {
        let loader = Loader::new(self.schema.clone());
        match self.delimiter {
            Some(c) if c.is_ascii() => loader.delimiter(c as u8),
            _ => loader,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChartConfig {
    pub name: String,
    pub dataset: String,
    #[serde(default)]
    pub options: Option<RenderOptions>,
    pub chart: ChartSpec,
    /// UI events replayed in order after mounting.
    #[serde(default)]
    pub events: Vec<Interaction>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Heatmap(HeatmapConfig),
    Scatter(ScatterConfig),
    Radar(RadarConfig),
    Bar(BarConfig),
    Parallel(ParallelConfig),
}

/// One recorded UI callback.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Interaction {
    Click { key: String },
    ClickBackground,
    Hover { key: String },
    Leave { key: String },
    XVariable { field: String },
    Dimension { index: usize, field: String },
    FilterRange { min: f64, max: f64 },
    FilterCategory { value: Option<String> },
}

/// A chart mounted on its canvas. Static charts carry no controller.
pub enum Mounted {
    Heatmap(Heatmap),
    Scatter(Controller<Scatter>),
    Radar(Controller<Radar>),
    Bar(Controller<Bar>),
    Parallel(Controller<Parallel>),
}

impl Mounted {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, spec: &ChartSpec) -> Result<Self> {
        Ok(match spec {
            ChartSpec::Heatmap(c) => Mounted::Heatmap(Heatmap::mount(canvas, data, c)?),
            ChartSpec::Scatter(c) => Mounted::Scatter(Controller::new(Scatter::mount(canvas, data, c)?)),
            ChartSpec::Radar(c) => Mounted::Radar(Controller::new(Radar::mount(canvas, data, c)?)),
            ChartSpec::Bar(c) => Mounted::Bar(Controller::new(Bar::mount(canvas, data, c)?)),
            ChartSpec::Parallel(c) => Mounted::Parallel(Controller::new(Parallel::mount(canvas, data, c)?)),
        })
    }

    /// Feed one UI event through the chart's controller. A static chart ignores it.
    pub fn replay(&mut self, canvas: &mut Canvas, event: &Interaction) -> Result<Vec<Effect>> {
        macro_rules! drive {
            ($ctl:expr) => {{
                let ctl = $ctl;
                match event {
                    Interaction::Click { key } => ctl.click(canvas, key.as_str()),
                    Interaction::ClickBackground => ctl.click_background(canvas),
                    Interaction::Hover { key } => ctl.hover(canvas, key.as_str()),
                    Interaction::Leave { key } => ctl.leave(canvas, key.as_str()),
                    Interaction::XVariable { field } => ctl.update_x_variable(canvas, field),
                    Interaction::Dimension { index, field } => ctl.update_dimension(canvas, *index, field),
                    Interaction::FilterRange { min, max } => ctl.filter_by_range(canvas, *min, *max),
                    Interaction::FilterCategory { value } => ctl.filter_by_category(canvas, value.as_deref()),
                }
            }};
        }
        match self {
            Mounted::Heatmap(_) => Ok(Vec::new()),
            Mounted::Scatter(c) => drive!(c),
            Mounted::Radar(c) => drive!(c),
            Mounted::Bar(c) => drive!(c),
            Mounted::Parallel(c) => drive!(c),
        }
    }
}

/// Outcome of rendering one configured chart.
pub struct RenderedChart {
    pub name: String,
    pub canvas: Canvas,
    /// The message shown in place of the chart, if it failed.
    pub error: Option<String>,
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a config file; dataset paths are resolved against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::from_json(&fs::read_to_string(path)?)?;
        if let Some(dir) = path.parent() {
            for ds in &mut config.datasets {
                if ds.path.is_relative() {
                    ds.path = dir.join(&ds.path);
                }
            }
        }
        Ok(config)
    }

    /// Load every dataset once. A failed load is kept so each dependent chart can report it.
    pub fn load_datasets(&self) -> HashMap<String, std::result::Result<DataContext, String>> {
        self.datasets
            .iter()
            .map(|ds| {
                let loaded = DataContext::load(&ds.loader(), &ds.path).map_err(|e: LoadError| {
                    warn!(dataset = %ds.name, error = %e, "dataset failed to load");
                    e.to_string()
                });
                (ds.name.clone(), loaded)
            })
            .collect()
    }

    /// Mount every chart on its own canvas and replay its events. Charts fail
    /// independently: a failure replaces only that chart with an error message.
    pub fn render(&self) -> Vec<RenderedChart> {
        let datasets = self.load_datasets();
        self.charts
            .iter()
            .map(|chart| {
                let options = chart.options.unwrap_or(self.options);
                let mut canvas = Canvas::from_options(&options);
                let error = match datasets.get(&chart.dataset) {
                    Some(Ok(data)) => render_chart(&mut canvas, data, chart).err(),
                    Some(Err(_)) | None => {
                        canvas.show_error(LOAD_ERROR_MESSAGE);
                        Some(LOAD_ERROR_MESSAGE.to_string())
                    }
                };
                RenderedChart { name: chart.name.clone(), canvas, error }
            })
            .collect()
    }

    pub fn page(&self, charts: &[RenderedChart]) -> Page {
        let mut page = Page::new(self.title.clone());
        for chart in charts {
            page.push(chart.name.clone(), &chart.canvas);
        }
        page
    }
}

/// Mount and replay; on a mount failure the canvas shows the render error.
/// A rejected event is logged and skipped.
fn render_chart(canvas: &mut Canvas, data: &DataContext, chart: &ChartConfig) -> std::result::Result<(), String> {
    let mut mounted = match Mounted::mount(canvas, data, &chart.chart) {
        Ok(m) => m,
        Err(e) => {
            warn!(chart = %chart.name, error = %e, "chart failed to mount");
            canvas.show_error(RENDER_ERROR_MESSAGE);
            return Err(RENDER_ERROR_MESSAGE.to_string());
        }
    };
    for event in &chart.events {
        if let Err(e) = mounted.replay(canvas, event) {
            warn!(chart = %chart.name, ?event, error = %e, "event rejected");
        }
    }
    info!(chart = %chart.name, marks = canvas.mark_count(), "chart rendered");
    Ok(())
}
