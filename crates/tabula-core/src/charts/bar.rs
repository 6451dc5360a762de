// File: crates/tabula-core/src/charts/bar.rs
// Summary: Grouped bar chart of per-group means, one bar per series, with a category filter
// that regroups the data and rescales the value axis.

use serde::Deserialize;
use tracing::debug;

use crate::aggregate::{distinct, group_by, CategoryKey, Group, GroupOrder, Metric};
use crate::axis::{Axis, Orientation};
use crate::canvas::{Canvas, LayerId};
use crate::color::Rgba;
use crate::context::DataContext;
use crate::error::Result;
use crate::geometry::Rect;
use crate::interaction::{Effect, EmphasisKind, Filter, InteractionState, InteractiveChart};
use crate::legend::{self, Swatch};
use crate::mark::{Anchor, Emphasis, Mark, MarkKey, Shape, Style};
use crate::record::{Column, Record};
use crate::render::Handle;
use crate::scale::{bind_scale, BandScale, DomainSource, LinearScale, Range, Scale, ScaleKind, ScaleOptions};
use crate::types::Insets;

/// One x category: the raw group value and its tick label.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BarGroup {
    pub key: String,
    pub label: String,
}

/// One bar per group: the mean of `field`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BarSeries {
    pub field: String,
    pub label: String,
    pub color: Rgba,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    pub title: String,
    pub group_field: String,
    /// Fixed group order and labels; the sorted distinct values when empty.
    pub groups: Vec<BarGroup>,
    pub series: Vec<BarSeries>,
    pub padding: f64,
    pub opacity: f64,
    pub ticks: usize,
    pub x_label: String,
    pub y_label: String,
    pub filter_field: Option<String>,
    /// Title suffix per filter value.
    pub filter_labels: Vec<(String, String)>,
    /// Title while filtered; `{title}` and `{filter}` are substituted.
    pub filtered_title: String,
    pub margin: Option<Insets>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            group_field: String::new(),
            groups: Vec::new(),
            series: Vec::new(),
            padding: 0.3,
            opacity: 0.7,
            ticks: 10,
            x_label: String::new(),
            y_label: String::new(),
            filter_field: None,
            filter_labels: Vec::new(),
            filtered_title: "{title} ({filter})".to_string(),
            margin: None,
        }
    }
}

impl BarConfig {
    fn title_for(&self, filter: Option<&Filter>) -> String {
        match filter {
            Some(Filter::Equals { value, .. }) => {
                let label = self
                    .filter_labels
                    .iter()
                    .find(|(k, _)| k == value)
                    .map_or(value.as_str(), |(_, v)| v.as_str());
                self.filtered_title.replace("{title}", &self.title).replace("{filter}", label)
            }
            Some(Filter::Range { min, max, .. }) => self
                .filtered_title
                .replace("{title}", &self.title)
                .replace("{filter}", &format!("{min}-{max}")),
            None => self.title.clone(),
        }
    }
}

fn bar_key(group: &str, series: &str) -> MarkKey {
    MarkKey::compound(&[group, series])
}

/// One drawn bar before encoding.
#[derive(Clone, Debug, PartialEq)]
struct BarDatum {
    group: String,
    series: usize,
    mean: f64,
}

/// A mounted grouped bar chart. Bars are keyed `"{group}|{field}"`.
pub struct Bar {
    config: BarConfig,
    data: DataContext,
    plot: Rect,
    group_col: Column,
    value_cols: Vec<Column>,
    x: BandScale,
    y: LinearScale,
    groups: Vec<Group<CategoryKey>>,
    frame: LayerId,
    axes: LayerId,
    bars: Handle,
    tooltip: LayerId,
}

impl Bar {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, config: &BarConfig) -> Result<Self> {
        let group_col = data.column(&config.group_field)?;
        let value_cols = config.series.iter().map(|s| data.column(&s.field)).collect::<Result<Vec<_>>>()?;
        let plot = super::frame(canvas, config.margin);

        let mut config = config.clone();
        if config.groups.is_empty() {
            config.groups = distinct(data.iter(), |r| CategoryKey::from(group_col.text(r)))
                .into_iter()
                .map(|k| BarGroup { key: k.to_string(), label: k.to_string() })
                .collect();
        }
        let x = bind_scale(
            ScaleKind::Band,
            DomainSource::categories(config.groups.iter().map(|g| g.key.clone())),
            Range::Pixels(0.0, plot.width()),
            &ScaleOptions::default().padding(config.padding),
        )?
        .into_band()?;

        let theme = *canvas.theme();
        let origin = (plot.left, plot.top);
        let frame = canvas.add_layer("bar-frame", origin);
        let axes = canvas.add_layer("bar-axes", origin);
        let bars_layer = canvas.add_layer("bar-bars", origin);
        let legend_layer = canvas.add_layer("bar-legend", (plot.right - 180.0, plot.top));
        let tooltip = canvas.add_layer("bar-tooltip", origin);

        let entries: Vec<(String, Rgba)> = config.series.iter().map(|s| (s.label.clone(), s.color)).collect();
        canvas.extend(legend_layer, legend_rows(&entries, &theme));

        let mut chart = Self {
            config,
            data: data.clone(),
            plot,
            group_col,
            value_cols,
            x,
            y: LinearScale::new((0.0, 1.0), (plot.height(), 0.0)),
            groups: Vec::new(),
            frame,
            axes,
            bars: Handle::attach(canvas, bars_layer),
            tooltip,
        };
        chart.refresh(canvas, None)?;
        Ok(chart)
    }

    pub fn bars(&self) -> &Handle {
        &self.bars
    }

    pub fn groups(&self) -> &[Group<CategoryKey>] {
        &self.groups
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x
    }

    pub fn frame_layer(&self) -> LayerId {
        self.frame
    }

    /// Regroup the records passing `filter`, rebind y and rejoin the bars.
    fn refresh(&mut self, canvas: &mut Canvas, filter: Option<&Filter>) -> Result<()> {
        let filter_col = filter.map(|f| self.data.column(f.field())).transpose()?;
        let visible = self.data.subset(|r| match (filter, &filter_col) {
            (Some(f), Some(col)) => col.value(r).is_some_and(|v| f.accepts(v)),
            _ => true,
        });
        let metrics: Vec<Metric<'_, Record>> = self
            .value_cols
            .iter()
            .map(|col| Metric::mean(col.name(), move |r: &Record| col.number(r)))
            .collect();
        let groups = group_by(visible.iter().copied(), |r| CategoryKey::from(self.group_col.text(r)), &metrics, GroupOrder::Ascending);
        debug!(visible = visible.len(), groups = groups.len(), "bar regrouped");

        let max_mean = groups
            .iter()
            .flat_map(|g| self.value_cols.iter().map(move |c| g.value(c.name())))
            .filter(|v| !v.is_nan())
            .fold(0.0, f64::max);
        self.y = bind_scale(
            ScaleKind::Linear,
            DomainSource::Extent(0.0, max_mean),
            Range::Pixels(self.plot.height(), 0.0),
            &ScaleOptions::default().nice(self.config.ticks),
        )?
        .into_linear()?;

        let bars: Vec<BarDatum> = groups
            .iter()
            .filter(|g| self.x.map(g.key.as_str()).is_some())
            .flat_map(|g| {
                self.value_cols
                    .iter()
                    .enumerate()
                    .map(move |(i, c)| BarDatum { group: g.key.to_string(), series: i, mean: g.value(c.name()) })
            })
            .filter(|b| !b.mean.is_nan())
            .collect();
        let mut handle = self.bars.clone();
        handle.update(canvas, &bars, |b| bar_key(&b.group, self.value_cols[b.series].name()), |b| self.encode(b));
        self.groups = groups;

        self.draw_axes(canvas)?;
        self.draw_title(canvas, filter);
        Ok(())
    }

    fn encode(&self, bar: &BarDatum) -> Mark {
        let series = &self.config.series[bar.series];
        let width = self.x.bandwidth() / self.config.series.len().max(1) as f64;
        let x = self.x.map(&bar.group).unwrap_or(0.0) + bar.series as f64 * width;
        let y = self.y.map(bar.mean);
        Mark::new(
            Shape::Rect { x, y, width, height: self.plot.height() - y },
            Style::fill(series.color).with_opacity(self.config.opacity),
        )
        .with_title(format!("{}: {:.2}", series.label, bar.mean))
        .with_class("bar")
    }

    fn draw_axes(&self, canvas: &mut Canvas) -> Result<()> {
        let theme = *canvas.theme();
        canvas.clear_layer(self.axes);
        let labels = &self.config.groups;
        let x_axis = Axis::from_scale(&Scale::Band(self.x.clone()), &self.config.x_label, Orientation::Bottom, 0)?
            .map_labels(|k| labels.iter().find(|g| g.key == k).map_or(k.to_string(), |g| g.label.clone()));
        let y_axis = Axis::from_scale(&Scale::Linear(self.y), &self.config.y_label, Orientation::Left, self.config.ticks)?
            .with_title_offset(45.0);
        canvas.extend(self.axes, super::prefixed(x_axis.marks(&theme, self.plot.height()), "x"));
        canvas.extend(self.axes, super::prefixed(y_axis.marks(&theme, 0.0), "y"));
        Ok(())
    }

    fn draw_title(&self, canvas: &mut Canvas, filter: Option<&Filter>) {
        let theme = *canvas.theme();
        canvas.clear_layer(self.frame);
        let title = self.config.title_for(filter);
        if !title.is_empty() {
            let local = Rect::from_ltwh(0.0, 0.0, self.plot.width(), self.plot.height());
            canvas.push(self.frame, super::title(&title, &local, 20.0, &theme));
        }
    }

    fn bar_at(&self, key: &MarkKey) -> Option<(String, f64, (f64, f64))> {
        let [group, field] = <[String; 2]>::try_from(key.parts()).ok()?;
        let (group, field) = (group.as_str(), field.as_str());
        let (i, col) = self.value_cols.iter().enumerate().find(|(_, c)| c.name() == field)?;
        let mean = self.groups.iter().find(|g| g.key.as_str() == group)?.value(col.name());
        let width = self.x.bandwidth() / self.value_cols.len().max(1) as f64;
        let x = self.x.map(group)? + (i as f64 + 0.5) * width;
        Some((self.config.series[i].label.clone(), mean, (x, self.y.map(mean))))
    }
}

/// Legend rows 25px apart with 18px squares.
fn legend_rows(entries: &[(String, Rgba)], theme: &crate::theme::Theme) -> Vec<Mark> {
    let mut marks = legend::ordinal(entries, None, Swatch::Square, theme);
    for m in &mut marks {
        let Some(row) = m.key.as_str().rsplit('-').next().and_then(|i| i.parse::<usize>().ok()) else {
            continue;
        };
        let y = row as f64 * 25.0;
        match &mut m.shape {
            Shape::Rect { x, y: ry, width, height } => {
                (*x, *ry, *width, *height) = (0.0, y, 18.0, 18.0);
            }
            Shape::Text { x, y: ty, font, .. } => {
                (*x, *ty) = (24.0, y + 13.0);
                font.anchor = Anchor::Start;
            }
            _ => {}
        }
    }
    marks
}

impl InteractiveChart for Bar {
    /// Grouping is fixed at mount; there are no switchable dimensions.
    fn dimensions(&self) -> Vec<String> {
        Vec::new()
    }

    fn check_field(&self, field: &str) -> Result<()> {
        self.data.column(field).map(|_| ())
    }

    fn filter_field(&self) -> Option<&str> {
        self.config.filter_field.as_deref()
    }

    fn apply(&mut self, canvas: &mut Canvas, state: &InteractionState, effect: &Effect) -> Result<()> {
        let theme = *canvas.theme();
        let emphasis = |kind| match kind {
            EmphasisKind::Selected => Emphasis::selected(theme.emphasis),
            EmphasisKind::Hovered => Emphasis { opacity: Some(1.0), ..Emphasis::default() },
        };
        if super::apply_emphasis(canvas, &self.bars, effect, emphasis) {
            return Ok(());
        }
        match effect {
            Effect::ShowTooltip(key) => {
                canvas.clear_layer(self.tooltip);
                if let Some((label, mean, anchor)) = self.bar_at(key) {
                    let bounds = Rect::from_ltwh(0.0, 0.0, self.plot.width(), self.plot.height());
                    let lines = [format!("{label}: {mean:.2}")];
                    canvas.extend(self.tooltip, super::tooltip(&lines, anchor, &bounds, &theme));
                }
            }
            Effect::HideTooltip => canvas.clear_layer(self.tooltip),
            Effect::Redraw | Effect::Refilter => self.refresh(canvas, state.filter.as_ref())?,
            Effect::Annotate(_) | Effect::ClearAnnotation | Effect::Revert(_) | Effect::Emphasize(..) => {}
        }
        Ok(())
    }
}
