// File: crates/tabula-core/src/charts/radar.rs
// Summary: Radar (star) plot of per-category feature means, each feature scaled by its
// global max, with grid levels, spokes, one polygon and vertex dots per category.

use serde::Deserialize;
use tracing::debug;

use crate::aggregate::{self, group_by, CategoryKey, Group, GroupOrder, Metric};
use crate::canvas::{Canvas, LayerId};
use crate::color::Rgba;
use crate::context::DataContext;
use crate::error::Result;
use crate::geometry::{spoke, spoke_angle, Rect};
use crate::grid::ring_radii;
use crate::interaction::{Effect, EmphasisKind, InteractionState, InteractiveChart};
use crate::legend::{self, Swatch};
use crate::mark::{Anchor, Emphasis, Font, Mark, MarkKey, Paint, Shape, Style};
use crate::record::{Column, Record};
use crate::render::{render, Handle};
use crate::scale::{LinearScale, OrdinalScale};
use crate::types::Insets;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub title: String,
    pub category_field: String,
    pub features: Vec<String>,
    /// Categories drawn, in legend order; every category when empty.
    pub display: Vec<String>,
    pub colors: Vec<(String, Rgba)>,
    pub fallback_color: Rgba,
    pub levels: usize,
    pub level_color: Rgba,
    /// Spoke labels sit at `radius × label_offset`.
    pub label_offset: f64,
    pub stroke_width: f64,
    pub dot_radius: f64,
    pub legend_title: String,
    pub note: Option<String>,
    pub margin: Option<Insets>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            category_field: String::new(),
            features: Vec::new(),
            display: Vec::new(),
            colors: Vec::new(),
            fallback_color: Rgba::rgb(0x99, 0x99, 0x99),
            levels: 5,
            level_color: Rgba::rgb(0xCD, 0xCD, 0xCD),
            label_offset: 1.15,
            stroke_width: 2.0,
            dot_radius: 4.0,
            legend_title: String::new(),
            note: None,
            margin: None,
        }
    }
}

/// A mounted radar plot. Polygons are keyed by category, dots by `"{category}|{feature}"`.
pub struct Radar {
    features: Vec<String>,
    groups: Vec<Group<CategoryKey>>,
    maxima: Vec<f64>,
    center: (f64, f64),
    radius: f64,
    polygons: Handle,
    dots: Handle,
    tooltip: LayerId,
}

impl Radar {
    pub fn mount(canvas: &mut Canvas, data: &DataContext, config: &RadarConfig) -> Result<Self> {
        let category = data.column(&config.category_field)?;
        let feature_cols = config.features.iter().map(|f| data.column(f)).collect::<Result<Vec<Column>>>()?;

        let metrics: Vec<Metric<'_, Record>> = feature_cols
            .iter()
            .map(|col| Metric::mean(col.name(), move |r: &Record| col.number(r)))
            .collect();
        let all = group_by(data.iter(), |r| CategoryKey::from(category.text(r)), &metrics, GroupOrder::Ascending);
        let groups: Vec<Group<CategoryKey>> = if config.display.is_empty() {
            all
        } else {
            // legend order follows the configured display list
            config
                .display
                .iter()
                .filter_map(|d| all.iter().find(|g| g.key.as_str() == d).cloned())
                .collect()
        };
        let maxima: Vec<f64> = feature_cols
            .iter()
            .map(|col| aggregate::max(data.iter(), |r| col.number(r)).unwrap_or(0.0))
            .collect();
        debug!(categories = groups.len(), features = maxima.len(), "radar grouped");

        let plot = super::frame(canvas, config.margin);
        let radius = plot.width().min(plot.height()) / 2.0;
        let center = plot.center();
        let colors = OrdinalScale::from_pairs(config.colors.iter().map(|(k, c)| (k.as_str(), *c)), config.fallback_color);
        let theme = *canvas.theme();

        let frame = canvas.add_layer("radar-frame", (0.0, 0.0));
        let grid = canvas.add_layer("radar-grid", center);
        let polygons_layer = canvas.add_layer("radar-polygons", center);
        let dots_layer = canvas.add_layer("radar-dots", center);
        let legend_layer = canvas.add_layer("radar-legend", (canvas.width() as f64 - 120.0, plot.top));
        let tooltip = canvas.add_layer("radar-tooltip", center);

        if !config.title.is_empty() {
            canvas.push(frame, super::title(&config.title, &plot, 20.0, &theme));
        }
        if let Some(text) = &config.note {
            let at = (canvas.width() as f64 / 2.0, canvas.height() as f64 - 20.0);
            canvas.extend(frame, super::note(text, at, plot.width(), Anchor::Middle, &theme));
        }
        canvas.extend(grid, grid_marks(config, radius, &theme));

        let mut chart = Self {
            features: config.features.clone(),
            groups,
            maxima,
            center,
            radius,
            polygons: Handle::attach(canvas, polygons_layer),
            dots: Handle::attach(canvas, dots_layer),
            tooltip,
        };

        let polygons = render(
            canvas,
            polygons_layer,
            &chart.groups,
            |g| MarkKey::new(g.key.as_str()),
            |g| {
                let points = chart.vertices(g);
                Mark::new(
                    Shape::Path { points, closed: true },
                    Style::stroke(colors.map(g.key.as_str()), config.stroke_width),
                )
                .with_title(g.key.to_string())
                .with_class("radar-area")
            },
        );
        let vertices: Vec<(String, usize, (f64, f64))> = chart
            .groups
            .iter()
            .flat_map(|g| chart.vertices(g).into_iter().enumerate().map(move |(i, p)| (g.key.to_string(), i, p)))
            .filter(|(_, _, (x, y))| !x.is_nan() && !y.is_nan())
            .collect();
        let dots = render(
            canvas,
            dots_layer,
            &vertices,
            |(cat, i, _)| MarkKey::compound(&[cat.as_str(), chart.features[*i].as_str()]),
            |(cat, _, (x, y))| {
                Mark::new(Shape::Circle { cx: *x, cy: *y, r: config.dot_radius }, Style::fill(colors.map(cat))).with_class("radar-dot")
            },
        );
        chart.polygons = polygons;
        chart.dots = dots;

        let entries: Vec<(String, Rgba)> = chart.groups.iter().map(|g| (g.key.to_string(), colors.map(g.key.as_str()))).collect();
        let title = (!config.legend_title.is_empty()).then_some(config.legend_title.as_str());
        let swatches = legend::ordinal(&entries, title, Swatch::Square, &theme)
            .into_iter()
            .map(|mut m| {
                if let Shape::Rect { x, y, width, height } = &mut m.shape {
                    (*x, *y, *width, *height) = (*x - 1.5, *y - 1.5, 15.0, 15.0);
                    m.style.opacity = 0.7;
                    m.style.stroke = Paint::None;
                }
                m
            });
        canvas.extend(legend_layer, swatches.collect::<Vec<_>>());
        Ok(chart)
    }

    /// Polygon vertices for one category, relative to the plot center.
    /// A feature with no data yields a NaN vertex, which breaks the outline.
    fn vertices(&self, group: &Group<CategoryKey>) -> Vec<(f64, f64)> {
        let n = self.features.len();
        self.features
            .iter()
            .zip(&self.maxima)
            .enumerate()
            .map(|(i, (feature, max))| {
                let scale = LinearScale::new((0.0, *max), (0.0, self.radius));
                let r = scale.map(group.value(feature));
                if r.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    spoke(r, i, n)
                }
            })
            .collect()
    }

    pub fn polygons(&self) -> &Handle {
        &self.polygons
    }

    pub fn dots(&self) -> &Handle {
        &self.dots
    }

    pub fn groups(&self) -> &[Group<CategoryKey>] {
        &self.groups
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn center(&self) -> (f64, f64) {
        self.center
    }
}

/// Concentric level polygons, spokes and feature labels around the origin.
fn grid_marks(config: &RadarConfig, radius: f64, theme: &crate::theme::Theme) -> Vec<Mark> {
    let n = config.features.len();
    let mut out = Vec::new();
    for (level, r) in ring_radii(radius, config.levels).into_iter().enumerate() {
        let points = (0..n).map(|i| spoke(r, i, n)).collect();
        out.push(
            Mark::new(Shape::Path { points, closed: true }, Style::stroke(config.level_color, 1.0))
                .keyed(format!("level-{level}"))
                .with_class("grid-level"),
        );
    }
    for (i, feature) in config.features.iter().enumerate() {
        let (x2, y2) = spoke(radius, i, n);
        out.push(
            Mark::new(Shape::Line { x1: 0.0, y1: 0.0, x2, y2 }, Style::stroke(config.level_color, 1.0))
                .keyed(format!("spoke-{i}"))
                .with_class("axis"),
        );
        let (lx, ly) = spoke(radius * config.label_offset, i, n);
        let cos = spoke_angle(i, n).cos();
        let anchor = if cos.abs() < 1e-6 {
            Anchor::Middle
        } else if cos > 0.0 {
            Anchor::Start
        } else {
            Anchor::End
        };
        out.push(
            Mark::new(Shape::text(lx, ly + 4.0, feature, Font::sized(12.0).anchor(anchor)), Style::fill(theme.text))
                .keyed(format!("spoke-label-{i}"))
                .with_class("axis-label"),
        );
    }
    out
}

impl InteractiveChart for Radar {
    fn dimensions(&self) -> Vec<String> {
        Vec::new()
    }

    fn check_field(&self, field: &str) -> Result<()> {
        Err(crate::error::ChartError::UnknownField(field.to_string()))
    }

    fn filter_field(&self) -> Option<&str> {
        None
    }

    fn apply(&mut self, canvas: &mut Canvas, _state: &InteractionState, effect: &Effect) -> Result<()> {
        let theme = *canvas.theme();
        let emphasis = |kind| match kind {
            EmphasisKind::Selected => Emphasis { stroke_width: Some(4.0), opacity: Some(1.0), ..Emphasis::default() },
            EmphasisKind::Hovered => Emphasis::highlighted_line(),
        };
        if super::apply_emphasis(canvas, &self.polygons, effect, emphasis) {
            return Ok(());
        }
        match effect {
            Effect::ShowTooltip(key) => {
                canvas.clear_layer(self.tooltip);
                if let Some(group) = self.groups.iter().find(|g| g.key.as_str() == key.as_str()) {
                    let mut lines = vec![group.key.to_string()];
                    lines.extend(self.features.iter().map(|f| format!("{f}: {:.1}", group.value(f))));
                    let bounds = Rect::from_ltwh(-self.radius, -self.radius, self.radius * 2.0, self.radius * 2.0);
                    canvas.extend(self.tooltip, super::tooltip(&lines, (0.0, -self.radius), &bounds, &theme));
                }
            }
            Effect::HideTooltip => canvas.clear_layer(self.tooltip),
            _ => {}
        }
        Ok(())
    }
}
