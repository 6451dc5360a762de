// File: crates/tabula-core/src/charts/parallel.rs
// Summary: Parallel-coordinates plot: one linear y scale per field, point x scale over the
// active dimensions, one path per record, dimension replacement and range filtering.

use serde::Deserialize;
use tracing::debug;

use crate::axis::{Axis, Orientation};
use crate::canvas::{Canvas, LayerId};
use crate::color::{ColorRamp, Rgba};
use crate::context::DataContext;
use crate::error::{ChartError, Result};
use crate::geometry::Rect;
use crate::interaction::{Effect, EmphasisKind, Filter, InteractionState, InteractiveChart};
use crate::mark::{Anchor, Emphasis, Font, Mark, MarkKey, Shape, Style};
use crate::record::{Column, Record, RecordId};
use crate::render::Handle;
use crate::scale::{bind_scale, DomainSource, LinearScale, PointScale, Range, Scale, ScaleKind, ScaleOptions, SequentialScale};
use crate::types::Insets;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub title: String,
    /// Active dimensions at mount, left to right.
    pub dimensions: Vec<String>,
    /// Fields a dimension slot may switch to; the active dimensions when empty.
    pub choices: Vec<String>,
    /// Display name per field.
    pub labels: Vec<(String, String)>,
    pub color_field: String,
    pub colors: (Rgba, Rgba),
    pub filter_field: Option<String>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub ticks: usize,
    pub margin: Option<Insets>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            dimensions: Vec::new(),
            choices: Vec::new(),
            labels: Vec::new(),
            color_field: String::new(),
            colors: (Rgba::rgb(0xFF, 0x5C, 0x8D), Rgba::rgb(0x2E, 0x86, 0xC1)),
            filter_field: None,
            stroke_width: 1.5,
            opacity: 0.5,
            ticks: 10,
            margin: None,
        }
    }
}

impl ParallelConfig {
    pub fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.labels.iter().find(|(k, _)| k == field).map_or(field, |(_, v)| v.as_str())
    }
}

/// Per-field y axis, bound once over the full record set.
#[derive(Clone, Debug)]
struct Dimension {
    column: Column,
    y: LinearScale,
}

/// A mounted parallel-coordinates plot. Lines are keyed by record id.
pub struct Parallel {
    config: ParallelConfig,
    data: DataContext,
    plot: Rect,
    scales: Vec<Dimension>,
    active: Vec<String>,
    x: PointScale,
    color_col: Column,
    color: SequentialScale,
    axes: LayerId,
    lines: Handle,
    tooltip: LayerId,
}

impl Parallel {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, config: &ParallelConfig) -> Result<Self> {
        let plot = super::frame(canvas, config.margin);
        let choices = if config.choices.is_empty() { &config.dimensions } else { &config.choices };

        // fields missing from the dataset are dropped rather than failing the chart
        let mut scales = Vec::new();
        for field in config.dimensions.iter().chain(choices) {
            if scales.iter().any(|d: &Dimension| d.column.name() == field) {
                continue;
            }
            let Ok(column) = data.column(field) else {
                debug!(field = %field, "parallel dimension not in dataset");
                continue;
            };
            let y = bind_scale(
                ScaleKind::Linear,
                DomainSource::extent_of(data.iter(), |r| column.number(r)),
                Range::Pixels(plot.height(), 0.0),
                &ScaleOptions::default(),
            )?
            .into_linear()?;
            scales.push(Dimension { column, y });
        }
        let active: Vec<String> = config
            .dimensions
            .iter()
            .filter(|f| scales.iter().any(|d| d.column.name() == f.as_str()))
            .cloned()
            .collect();

        let color_col = data.column(&config.color_field)?;
        let color = bind_scale(
            ScaleKind::Sequential,
            DomainSource::extent_of(data.iter(), |r| color_col.number(r)),
            Range::Colors(ColorRamp::between(config.colors.0, config.colors.1)),
            &ScaleOptions::default(),
        )?
        .into_sequential()?;

        let theme = *canvas.theme();
        let origin = (plot.left, plot.top);
        let frame = canvas.add_layer("parallel-frame", origin);
        let lines_layer = canvas.add_layer("parallel-lines", origin);
        let axes = canvas.add_layer("parallel-axes", origin);
        let tooltip = canvas.add_layer("parallel-tooltip", origin);
        if !config.title.is_empty() {
            let local = Rect::from_ltwh(0.0, 0.0, plot.width(), plot.height());
            canvas.push(frame, super::title(&config.title, &local, 30.0, &theme));
        }

        let mut chart = Self {
            config: config.clone(),
            data: data.clone(),
            plot,
            scales,
            x: PointScale::new(active.clone(), (0.0, plot.width()), 0.0),
            active,
            color_col,
            color,
            axes,
            lines: Handle::attach(canvas, lines_layer),
            tooltip,
        };
        chart.draw_axes(canvas)?;
        chart.rejoin(canvas, None)?;
        Ok(chart)
    }

    pub fn lines(&self) -> &Handle {
        &self.lines
    }

    pub fn active_dimensions(&self) -> &[String] {
        &self.active
    }

    pub fn x_scale(&self) -> &PointScale {
        &self.x
    }

    pub fn y_scale(&self, field: &str) -> Option<&LinearScale> {
        self.dimension(field).map(|d| &d.y)
    }

    fn dimension(&self, field: &str) -> Option<&Dimension> {
        self.scales.iter().find(|d| d.column.name() == field)
    }

    fn path(&self, r: &Record) -> Vec<(f64, f64)> {
        self.active
            .iter()
            .filter_map(|field| {
                let d = self.dimension(field)?;
                let x = self.x.map(field)?;
                let v = d.column.number(r);
                Some(if v.is_nan() { (x, f64::NAN) } else { (x, d.y.map(v)) })
            })
            .collect()
    }

    fn encode(&self, r: &Record) -> Mark {
        let stroke = self.color.map(self.color_col.number(r));
        Mark::new(
            Shape::Path { points: self.path(r), closed: false },
            Style::stroke(stroke, self.config.stroke_width).with_opacity(self.config.opacity),
        )
        .with_class("line")
    }

    fn draw_axes(&self, canvas: &mut Canvas) -> Result<()> {
        let theme = *canvas.theme();
        canvas.clear_layer(self.axes);
        for (i, field) in self.active.iter().enumerate() {
            let (Some(d), Some(x)) = (self.dimension(field), self.x.map(field)) else {
                continue;
            };
            let axis = Axis::from_scale(&Scale::Linear(d.y), "", Orientation::Left, self.config.ticks)?;
            canvas.extend(self.axes, super::prefixed(axis.marks(&theme, x), &format!("axis-{i}")));
            canvas.push(
                self.axes,
                Mark::new(
                    Shape::text(x, -15.0, self.config.label(field), Font::sized(12.0).anchor(Anchor::Middle)),
                    Style::fill(theme.axis_label),
                )
                .keyed(format!("axis-{i}-title"))
                .with_class("axis-title"),
            );
        }
        Ok(())
    }

    fn rejoin(&mut self, canvas: &mut Canvas, filter: Option<&Filter>) -> Result<()> {
        let filter_col = filter.map(|f| self.data.column(f.field())).transpose()?;
        let visible = self.data.subset(|r| match (filter, &filter_col) {
            (Some(f), Some(col)) => col.value(r).is_some_and(|v| f.accepts(v)),
            _ => true,
        });
        let mut lines = self.lines.clone();
        lines.update(canvas, visible, |r: &Record| MarkKey::from(r.id()), |r| self.encode(r));
        self.lines = lines;
        Ok(())
    }

    fn record(&self, key: &MarkKey) -> Option<&Record> {
        key.as_str().parse::<u32>().ok().and_then(|id| self.data.get(RecordId(id)))
    }
}

impl InteractiveChart for Parallel {
    fn dimensions(&self) -> Vec<String> {
        self.active.clone()
    }

    fn check_field(&self, field: &str) -> Result<()> {
        match self.dimension(field) {
            Some(_) => Ok(()),
            None => Err(ChartError::UnknownField(field.to_string())),
        }
    }

    fn filter_field(&self) -> Option<&str> {
        self.config.filter_field.as_deref()
    }

    fn apply(&mut self, canvas: &mut Canvas, state: &InteractionState, effect: &Effect) -> Result<()> {
        let theme = *canvas.theme();
        let emphasis = |kind| match kind {
            EmphasisKind::Selected => Emphasis { stroke: Some(theme.emphasis), ..Emphasis::highlighted_line() },
            EmphasisKind::Hovered => Emphasis::highlighted_line(),
        };
        if super::apply_emphasis(canvas, &self.lines, effect, emphasis) {
            return Ok(());
        }
        match effect {
            Effect::ShowTooltip(key) => {
                canvas.clear_layer(self.tooltip);
                if let Some(r) = self.record(key) {
                    let lines: Vec<String> = self
                        .active
                        .iter()
                        .filter_map(|f| self.dimension(f).map(|d| format!("{}: {}", self.config.label(f), d.column.text(r))))
                        .collect();
                    let anchor = self.path(r).into_iter().find(|(_, y)| !y.is_nan()).unwrap_or((0.0, 0.0));
                    let bounds = Rect::from_ltwh(0.0, 0.0, self.plot.width(), self.plot.height());
                    canvas.extend(self.tooltip, super::tooltip(&lines, anchor, &bounds, &theme));
                }
            }
            Effect::HideTooltip => canvas.clear_layer(self.tooltip),
            Effect::Redraw => {
                self.active = state.dimensions.clone();
                self.x.set_domain(self.active.clone());
                self.draw_axes(canvas)?;
                self.rejoin(canvas, state.filter.as_ref())?;
            }
            Effect::Refilter => self.rejoin(canvas, state.filter.as_ref())?,
            Effect::Annotate(_) | Effect::ClearAnnotation | Effect::Revert(_) | Effect::Emphasize(..) => {}
        }
        Ok(())
    }
}
