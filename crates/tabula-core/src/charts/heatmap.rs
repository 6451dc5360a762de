// File: crates/tabula-core/src/charts/heatmap.rs
// Summary: Count heatmap over (row category × column ordinal) with zero-filled cells,
// sequential fill, gradient legend and a wrapped footnote.

use serde::Deserialize;
use tracing::debug;

use crate::aggregate::{distinct, fill_cross_product, group_by, CategoryKey, Group, GroupOrder, Metric};
use crate::axis::{Axis, Orientation};
use crate::canvas::{Canvas, LayerId};
use crate::color::ColorRamp;
use crate::context::DataContext;
use crate::error::Result;
use crate::geometry::Rect;
use crate::mark::{Anchor, Font, Mark, Shape, Style};
use crate::render::{render, Handle};
use crate::scale::{bind_scale, BandScale, DomainSource, Range, Scale, ScaleKind, ScaleOptions, SequentialScale};
use crate::types::Insets;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub title: String,
    pub row_field: String,
    pub column_field: String,
    pub row_label: String,
    pub column_label: String,
    /// Column tick label; `{}` is replaced by the column key.
    pub column_format: String,
    pub padding: f64,
    pub legend_title: String,
    pub legend_ticks: usize,
    pub legend_size: (f64, f64),
    pub note: Option<String>,
    pub margin: Option<Insets>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            row_field: String::new(),
            column_field: String::new(),
            row_label: String::new(),
            column_label: String::new(),
            column_format: "{}".to_string(),
            padding: 0.01,
            legend_title: "Count".to_string(),
            legend_ticks: 5,
            legend_size: (200.0, 20.0),
            note: None,
            margin: None,
        }
    }
}

/// A mounted heatmap. Static: it has no interaction state.
#[derive(Debug)]
pub struct Heatmap {
    cells: Handle,
    labels: Handle,
    x: BandScale,
    y: BandScale,
    color: SequentialScale,
    groups: Vec<Group<(CategoryKey, CategoryKey)>>,
}

fn cell_key(g: &Group<(CategoryKey, CategoryKey)>) -> crate::mark::MarkKey {
    crate::mark::MarkKey::compound(&[g.key.0.to_string(), g.key.1.to_string()])
}

impl Heatmap {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, config: &HeatmapConfig) -> Result<Self> {
        let row = data.column(&config.row_field)?;
        let col = data.column(&config.column_field)?;
        let row_key = |r: &crate::record::Record| CategoryKey::from(row.text(r));
        let col_key = |r: &crate::record::Record| CategoryKey::from(col.text(r));

        let rows = distinct(data.iter(), row_key);
        let cols = distinct(data.iter(), col_key);
        let counted = group_by(data.iter(), |r| (row_key(r), col_key(r)), &[Metric::count("count")], GroupOrder::Ascending);
        let groups = fill_cross_product(counted, &rows, &cols);
        debug!(rows = rows.len(), columns = cols.len(), cells = groups.len(), "heatmap grouped");

        let plot = super::frame(canvas, config.margin);
        let opts = ScaleOptions::default().padding(config.padding);
        let x = bind_scale(
            ScaleKind::Band,
            DomainSource::categories(cols.iter().map(CategoryKey::to_string)),
            Range::Pixels(0.0, plot.width()),
            &opts,
        )?
        .into_band()?;
        let y = bind_scale(
            ScaleKind::Band,
            DomainSource::categories(rows.iter().map(CategoryKey::to_string)),
            Range::Pixels(0.0, plot.height()),
            &opts,
        )?
        .into_band()?;
        let max_count = groups.iter().map(|g| g.count).max().unwrap_or(0) as f64;
        let color = bind_scale(
            ScaleKind::Sequential,
            DomainSource::Extent(0.0, max_count),
            Range::Colors(ColorRamp::yl_or_br()),
            &ScaleOptions::default(),
        )?
        .into_sequential()?;

        let theme = *canvas.theme();
        let origin = (plot.left, plot.top);
        let frame_layer = canvas.add_layer("heatmap-frame", (0.0, 0.0));
        let axes = canvas.add_layer("heatmap-axes", origin);
        let cells_layer = canvas.add_layer("heatmap-cells", origin);
        let labels_layer = canvas.add_layer("heatmap-labels", origin);

        if !config.title.is_empty() {
            canvas.push(frame_layer, super::title(&config.title, &plot, 30.0, &theme));
        }
        let x_axis = Axis::from_scale(&Scale::Band(x.clone()), &config.column_label, Orientation::Bottom, 0)?
            .map_labels(|l| config.column_format.replace("{}", l));
        let y_axis = Axis::from_scale(&Scale::Band(y.clone()), &config.row_label, Orientation::Left, 0)?
            .with_title_offset(60.0);
        canvas.extend(axes, super::prefixed(x_axis.marks(&theme, plot.height()), "x"));
        canvas.extend(axes, super::prefixed(y_axis.marks(&theme, 0.0), "y"));

        let (bw, bh) = (x.bandwidth(), y.bandwidth());
        let cells = render(canvas, cells_layer, &groups, cell_key, |g| {
            let fill = if g.count == 0 { theme.empty_cell } else { color.map(g.count as f64) };
            let (cx, cy) = (x.map(g.key.1.as_str()).unwrap_or(0.0), y.map(g.key.0.as_str()).unwrap_or(0.0));
            Mark::new(
                Shape::Rect { x: cx, y: cy, width: bw, height: bh },
                Style::fill(fill).with_stroke(theme.cell_stroke, 0.5),
            )
            .with_title(format!("{}, {}: {}", g.key.0, config.column_format.replace("{}", g.key.1.as_str()), g.count))
            .with_class("cell")
        });
        // zero cells carry a literal "0" rather than a blank
        let labels = render(canvas, labels_layer, &groups, cell_key, |g| {
            let cx = x.center(g.key.1.as_str()).unwrap_or(0.0);
            let cy = y.center(g.key.0.as_str()).unwrap_or(0.0);
            Mark::new(
                Shape::text(cx, cy + 4.0, g.count.to_string(), Font::sized(12.0).anchor(Anchor::Middle).bold()),
                Style::fill(theme.text),
            )
            .with_class("cell-label")
        });

        Self::draw_legend(canvas, config, &plot, &color)?;
        Ok(Self { cells, labels, x, y, color, groups })
    }

    fn draw_legend(canvas: &mut Canvas, config: &HeatmapConfig, plot: &Rect, color: &SequentialScale) -> Result<LayerId> {
        let theme = *canvas.theme();
        let (lw, lh) = config.legend_size;
        let legend = canvas.add_layer("heatmap-legend", (plot.right - lw - 20.0, plot.bottom + 50.0));
        let marks = crate::legend::gradient(canvas, "heatmap-gradient", color, &config.legend_title, (lw, lh), config.legend_ticks)?;
        canvas.extend(legend, marks);

        if let Some(text) = &config.note {
            let notes = canvas.add_layer("heatmap-note", (plot.left, plot.top));
            let width = plot.width() / 2.0 - 40.0;
            canvas.extend(notes, super::note(text, (20.0, plot.height() + 50.0), width, Anchor::Start, &theme));
        }
        Ok(legend)
    }

    pub fn cells(&self) -> &Handle {
        &self.cells
    }

    pub fn labels(&self) -> &Handle {
        &self.labels
    }

    pub fn groups(&self) -> &[Group<(CategoryKey, CategoryKey)>] {
        &self.groups
    }

    pub fn x(&self) -> &BandScale {
        &self.x
    }

    pub fn y(&self) -> &BandScale {
        &self.y
    }

    pub fn color(&self) -> &SequentialScale {
        &self.color
    }
}
