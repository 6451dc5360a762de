// File: crates/tabula-core/src/charts/scatter.rs
// Summary: Scatter plot with optional size encoding, category colors, legends,
// click-to-select annotation, hover tooltip and x-variable switching.

use serde::Deserialize;

use crate::aggregate::{self, top_by_count, CategoryKey};
use crate::axis::{Axis, Orientation};
use crate::canvas::{Canvas, LayerId};
use crate::color::Rgba;
use crate::context::DataContext;
use crate::error::Result;
use crate::geometry::Rect;
use crate::interaction::{Effect, EmphasisKind, Filter, InteractionState, InteractiveChart};
use crate::legend::{self, Swatch};
use crate::mark::{Anchor, Emphasis, Font, Mark, MarkKey, Shape, Style};
use crate::record::{Column, Record, RecordId};
use crate::render::Handle;
use crate::scale::{bind_scale, DomainSource, LinearScale, OrdinalScale, Range, Scale, ScaleKind, ScaleOptions};
use crate::types::Insets;

/// One line of the hover tooltip: `"{label}: {value}{suffix}"`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TooltipField {
    pub label: String,
    pub field: String,
    #[serde(default)]
    pub suffix: String,
}

/// Label drawn above the selected point; `{}` in `format` is the field value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Annotation {
    pub field: String,
    pub format: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub title: String,
    pub x_field: String,
    pub y_field: String,
    /// Axis title per field; a field without an entry is titled by its name.
    pub axis_labels: Vec<(String, String)>,
    /// Fixed domain; otherwise `[0, max × headroom]`.
    pub x_domain: Option<(f64, f64)>,
    pub y_domain: Option<(f64, f64)>,
    pub headroom: f64,
    pub ticks: usize,
    pub color_field: String,
    pub colors: Vec<(String, Rgba)>,
    /// Display names of category values (legend and tooltip).
    pub category_labels: Vec<(String, String)>,
    pub fallback_color: Rgba,
    pub legend_title: String,
    /// Only the N most frequent categories in the legend; all colors when unset.
    pub legend_top: Option<usize>,
    /// Legend position relative to the plot origin; defaults to the top-right corner inside the plot.
    pub legend_at: Option<(f64, f64)>,
    pub legend_note: Option<String>,
    pub radius: f64,
    pub size_field: Option<String>,
    /// Upper bound of the size domain.
    pub size_cap: f64,
    pub size_range: (f64, f64),
    pub size_legend: Vec<f64>,
    pub size_legend_title: String,
    pub opacity: f64,
    /// Point outline; the theme's mark outline when unset.
    pub outline: Option<Rgba>,
    pub outline_width: f64,
    pub plot_background: bool,
    pub grid: bool,
    pub tooltip: Vec<TooltipField>,
    pub annotation: Option<Annotation>,
    pub filter_field: Option<String>,
    pub note: Option<String>,
    pub margin: Option<Insets>,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_field: String::new(),
            y_field: String::new(),
            axis_labels: Vec::new(),
            x_domain: None,
            y_domain: None,
            headroom: 1.05,
            ticks: 10,
            color_field: String::new(),
            colors: Vec::new(),
            category_labels: Vec::new(),
            fallback_color: Rgba::rgb(0x99, 0x99, 0x99),
            legend_title: String::new(),
            legend_top: None,
            legend_at: None,
            legend_note: None,
            radius: 6.0,
            size_field: None,
            size_cap: 30.0,
            size_range: (3.0, 15.0),
            size_legend: vec![0.0, 10.0, 20.0],
            size_legend_title: String::new(),
            opacity: 0.8,
            outline: None,
            outline_width: 0.5,
            plot_background: false,
            grid: false,
            tooltip: Vec::new(),
            annotation: None,
            filter_field: None,
            note: None,
            margin: None,
        }
    }
}

impl ScatterConfig {
    pub fn axis_label(&self, field: &str) -> String {
        lookup(&self.axis_labels, field).unwrap_or(field).to_string()
    }

    pub fn category_label<'a>(&'a self, category: &'a str) -> &'a str {
        lookup(&self.category_labels, category).unwrap_or(category)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// A mounted scatter plot. Points are keyed by record id.
pub struct Scatter {
    config: ScatterConfig,
    data: DataContext,
    plot: Rect,
    x_col: Column,
    y_col: Column,
    color_col: Column,
    x: LinearScale,
    y: LinearScale,
    size: Option<(Column, LinearScale)>,
    color: OrdinalScale,
    outline: Rgba,
    axes: LayerId,
    points: Handle,
    annotation: LayerId,
    tooltip: LayerId,
}

impl Scatter {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, config: &ScatterConfig) -> Result<Self> {
        let x_col = data.column(&config.x_field)?;
        let y_col = data.column(&config.y_field)?;
        let color_col = data.column(&config.color_field)?;
        let plot = super::frame(canvas, config.margin);

        let x = bind_axis(data, &x_col, config.x_domain, (0.0, plot.width()), config)?;
        let y = bind_axis(data, &y_col, config.y_domain, (plot.height(), 0.0), config)?;
        let size = match &config.size_field {
            Some(field) => {
                let col = data.column(field)?;
                let max = aggregate::max(data.iter(), |r| col.number(r)).unwrap_or(0.0);
                let scale = bind_scale(
                    ScaleKind::Linear,
                    DomainSource::Extent(0.0, max.min(config.size_cap)),
                    Range::Pixels(config.size_range.0, config.size_range.1),
                    &ScaleOptions::default(),
                )?
                .into_linear()?;
                Some((col, scale))
            }
            None => None,
        };
        let color = OrdinalScale::from_pairs(config.colors.iter().map(|(k, c)| (k.as_str(), *c)), config.fallback_color);

        let theme = *canvas.theme();
        let origin = (plot.left, plot.top);
        let frame = canvas.add_layer("scatter-frame", origin);
        let axes = canvas.add_layer("scatter-axes", origin);
        let points_layer = canvas.add_layer("scatter-points", origin);
        let annotation = canvas.add_layer("scatter-annotation", origin);
        let legend_layer = canvas.add_layer("scatter-legend", origin);
        let tooltip = canvas.add_layer("scatter-tooltip", origin);

        if config.plot_background {
            canvas.push(
                frame,
                Mark::new(Shape::Rect { x: 0.0, y: 0.0, width: plot.width(), height: plot.height() }, Style::fill(theme.plot_background))
                    .keyed("background")
                    .with_class("background"),
            );
        }
        if !config.title.is_empty() {
            let local = Rect::from_ltwh(0.0, 0.0, plot.width(), plot.height());
            canvas.push(frame, super::title(&config.title, &local, 25.0, &theme));
        }
        if let Some(text) = &config.note {
            let marks = super::note(text, (plot.width() / 2.0, plot.height() + 55.0), plot.width(), Anchor::Middle, &theme);
            canvas.extend(frame, marks);
        }

        let mut chart = Self {
            config: config.clone(),
            data: data.clone(),
            plot,
            x_col,
            y_col,
            color_col,
            x,
            y,
            size,
            color,
            outline: config.outline.unwrap_or(theme.mark_outline),
            axes,
            points: Handle::attach(canvas, points_layer),
            annotation,
            tooltip,
        };
        chart.draw_axes(canvas)?;
        chart.rejoin(canvas, None)?;
        chart.draw_legend(canvas, legend_layer);
        Ok(chart)
    }

    pub fn points(&self) -> &Handle {
        &self.points
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn x_field(&self) -> &str {
        self.x_col.name()
    }

    pub fn annotation_layer(&self) -> LayerId {
        self.annotation
    }

    pub fn tooltip_layer(&self) -> LayerId {
        self.tooltip
    }

    pub fn axes_layer(&self) -> LayerId {
        self.axes
    }

    fn radius(&self, r: &Record) -> f64 {
        self.size
            .as_ref()
            .map(|(col, scale)| scale.map(col.number(r)))
            .filter(|v| !v.is_nan())
            .unwrap_or(self.config.radius)
    }

    fn position(&self, r: &Record) -> (f64, f64) {
        (self.x.map(self.x_col.number(r)), self.y.map(self.y_col.number(r)))
    }

    fn display(&self, field: &str, r: &Record) -> String {
        let value = self.data.column(field).map(|c| c.text(r).into_owned()).unwrap_or_default();
        if field == self.color_col.name() {
            self.config.category_label(&value).to_string()
        } else {
            value
        }
    }

    fn tooltip_lines(&self, r: &Record) -> Vec<String> {
        self.config
            .tooltip
            .iter()
            .map(|t| format!("{}: {}{}", t.label, self.display(&t.field, r), t.suffix))
            .collect()
    }

    fn encode(&self, r: &Record) -> Mark {
        let (cx, cy) = self.position(r);
        let style = Style::fill(self.color.map(&self.color_col.text(r)))
            .with_stroke(self.outline, self.config.outline_width)
            .with_opacity(self.config.opacity);
        let mut mark = Mark::new(Shape::Circle { cx, cy, r: self.radius(r) }, style).with_class("dot");
        let lines = self.tooltip_lines(r);
        if !lines.is_empty() {
            mark = mark.with_title(lines.join("\n"));
        }
        mark
    }

    fn record(&self, key: &MarkKey) -> Option<&Record> {
        key.as_str().parse::<u32>().ok().and_then(|id| self.data.get(RecordId(id)))
    }

    fn draw_axes(&mut self, canvas: &mut Canvas) -> Result<()> {
        let theme = *canvas.theme();
        canvas.clear_layer(self.axes);
        let x_axis = Axis::from_scale(
            &Scale::Linear(self.x),
            self.config.axis_label(self.x_col.name()),
            Orientation::Bottom,
            self.config.ticks,
        )?;
        let y_axis = Axis::from_scale(
            &Scale::Linear(self.y),
            self.config.axis_label(self.y_col.name()),
            Orientation::Left,
            self.config.ticks,
        )?
        .with_title_offset(50.0);
        if self.config.grid {
            canvas.extend(self.axes, y_axis.grid_lines(&theme, self.plot.width()));
        }
        canvas.extend(self.axes, super::prefixed(x_axis.marks(&theme, self.plot.height()), "x"));
        canvas.extend(self.axes, super::prefixed(y_axis.marks(&theme, 0.0), "y"));
        Ok(())
    }

    /// Rejoin points to the records passing `filter` that have both coordinates.
    fn rejoin(&mut self, canvas: &mut Canvas, filter: Option<&Filter>) -> Result<()> {
        let filter_col = filter.map(|f| self.data.column(f.field())).transpose()?;
        let visible = self.data.subset(|r| {
            let placed = !self.x_col.number(r).is_nan() && !self.y_col.number(r).is_nan();
            let passes = match (filter, &filter_col) {
                (Some(f), Some(col)) => col.value(r).is_some_and(|v| f.accepts(v)),
                _ => true,
            };
            placed && passes
        });
        let mut points = self.points.clone();
        points.update(canvas, visible, |r: &Record| MarkKey::from(r.id()), |r| self.encode(r));
        self.points = points;
        Ok(())
    }

    fn draw_legend(&self, canvas: &mut Canvas, layer: LayerId) {
        let theme = *canvas.theme();
        let (lx, ly) = self.config.legend_at.unwrap_or((self.plot.width() - 120.0, 10.0));
        canvas.layer_mut(layer).origin = (self.plot.left + lx, self.plot.top + ly);

        let categories: Vec<String> = match self.config.legend_top {
            Some(n) => top_by_count(self.data.iter(), |r| CategoryKey::from(self.color_col.text(r)), n)
                .into_iter()
                .map(|k| k.to_string())
                .collect(),
            None => self.config.colors.iter().map(|(k, _)| k.clone()).collect(),
        };
        let entries: Vec<(String, Rgba)> = categories
            .iter()
            .map(|c| (self.config.category_label(c).to_string(), self.color.map(c)))
            .collect();
        let title = (!self.config.legend_title.is_empty()).then_some(self.config.legend_title.as_str());
        canvas.extend(layer, legend::ordinal(&entries, title, Swatch::Circle, &theme));

        let mut below = entries.len() as f64 * 20.0 + 15.0;
        if let Some(text) = &self.config.legend_note {
            let lines = super::note(text, (0.0, below), 110.0, Anchor::Start, &theme);
            below += lines.len() as f64 * 15.0 + 15.0;
            canvas.extend(layer, super::prefixed(lines, "legend"));
        }
        if let Some((_, scale)) = &self.size {
            if !self.config.size_legend.is_empty() {
                let samples: Vec<(String, f64)> = self.config.size_legend.iter().map(|v| (v.to_string(), scale.map(*v))).collect();
                let title = (!self.config.size_legend_title.is_empty()).then_some(self.config.size_legend_title.as_str());
                let marks = super::shifted(legend::size(&samples, title, &theme), 0.0, below + 15.0);
                canvas.extend(layer, marks);
            }
        }
    }

    fn emphasis(&self, kind: EmphasisKind, outline: Rgba) -> Emphasis {
        match kind {
            EmphasisKind::Selected => Emphasis::selected(outline),
            EmphasisKind::Hovered => Emphasis::hovered(),
        }
    }
}

/// Linear position scale: an explicit domain niced as is, otherwise zero to max with headroom.
fn bind_axis(data: &DataContext, col: &Column, domain: Option<(f64, f64)>, range: (f64, f64), config: &ScatterConfig) -> Result<LinearScale> {
    let (source, options) = match domain {
        Some((lo, hi)) => (DomainSource::Extent(lo, hi), ScaleOptions::default().nice(config.ticks)),
        None => (
            DomainSource::zero_to_max(data.iter(), |r| col.number(r)),
            ScaleOptions::default().headroom(config.headroom).nice(config.ticks),
        ),
    };
    bind_scale(ScaleKind::Linear, source, Range::Pixels(range.0, range.1), &options)?.into_linear()
}

impl InteractiveChart for Scatter {
    fn dimensions(&self) -> Vec<String> {
        vec![self.x_col.name().to_string(), self.y_col.name().to_string()]
    }

    fn check_field(&self, field: &str) -> Result<()> {
        self.data.column(field).map(|_| ())
    }

    fn filter_field(&self) -> Option<&str> {
        self.config.filter_field.as_deref()
    }

    fn apply(&mut self, canvas: &mut Canvas, state: &InteractionState, effect: &Effect) -> Result<()> {
        let theme = *canvas.theme();
        if super::apply_emphasis(canvas, &self.points, effect, |kind| self.emphasis(kind, theme.emphasis)) {
            return Ok(());
        }
        match effect {
            Effect::Annotate(key) => {
                // a record hidden by the active filter has no mark to annotate
                let (Some(spec), Some(r), Some(_)) =
                    (&self.config.annotation, self.record(key), self.points.mark(canvas, key))
                else {
                    return Ok(());
                };
                let (cx, cy) = self.position(r);
                let lift = self.radius(r) + Emphasis::selected(theme.emphasis).grow + 8.0;
                let text = spec.format.replace("{}", &self.display(&spec.field, r));
                let mark = Mark::new(
                    Shape::text(cx, cy - lift, text, Font::sized(12.0).anchor(Anchor::Middle).bold()),
                    Style::fill(theme.emphasis),
                )
                .keyed(key.clone())
                .with_class("annotation");
                canvas.clear_layer(self.annotation);
                canvas.push(self.annotation, mark);
            }
            Effect::ClearAnnotation => canvas.clear_layer(self.annotation),
            Effect::ShowTooltip(key) => {
                canvas.clear_layer(self.tooltip);
                if let (Some(r), Some(_)) = (self.record(key), self.points.mark(canvas, key)) {
                    let bounds = Rect::from_ltwh(0.0, 0.0, self.plot.width(), self.plot.height());
                    let marks = super::tooltip(&self.tooltip_lines(r), self.position(r), &bounds, &theme);
                    canvas.extend(self.tooltip, marks);
                }
            }
            Effect::HideTooltip => canvas.clear_layer(self.tooltip),
            Effect::Redraw => {
                let [x_field, y_field] = [0, 1].map(|i| state.dimensions.get(i).cloned().unwrap_or_default());
                self.x_col = self.data.column(&x_field)?;
                self.y_col = self.data.column(&y_field)?;
                // a fixed domain belongs to the slot, not the field
                self.x = bind_axis(&self.data, &self.x_col, self.config.x_domain, (0.0, self.plot.width()), &self.config)?;
                self.y = bind_axis(&self.data, &self.y_col, self.config.y_domain, (self.plot.height(), 0.0), &self.config)?;
                self.draw_axes(canvas)?;
                self.rejoin(canvas, state.filter.as_ref())?;
            }
            Effect::Refilter => self.rejoin(canvas, state.filter.as_ref())?,
            Effect::Revert(_) | Effect::Emphasize(..) => {}
        }
        Ok(())
    }
}
