// File: crates/tabula-core/src/lib.rs
// Summary: Core library entry point; typed loading, aggregation, scales, keyed rendering,
// interaction and the chart kinds built on them.

pub mod aggregate;
pub mod axis;
pub mod canvas;
pub mod charts;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod interaction;
pub mod legend;
pub mod loader;
pub mod mark;
pub mod page;
pub mod record;
pub mod render;
pub mod scale;
pub mod schema;
pub mod svg;
pub mod text;
pub mod theme;
pub mod types;

pub use aggregate::{group_by, CategoryKey, Group, GroupOrder, Metric, Reducer};
pub use axis::Axis;
pub use canvas::{Canvas, LayerId};
pub use color::{ColorRamp, Rgba};
pub use config::{ChartSpec, DashboardConfig, Interaction, Mounted};
pub use context::DataContext;
pub use error::{ChartError, LoadError, Result};
pub use interaction::{reduce, Controller, Effect, Event, Filter, InteractionState, InteractiveChart, Selection};
pub use loader::{load, Loader};
pub use mark::{Emphasis, Mark, MarkKey, Shape, Style};
pub use page::Page;
pub use record::{Record, RecordId, RecordSet, Value};
pub use render::{render, Handle, JoinSummary};
pub use scale::{bind_scale, DomainSource, Range, Scale, ScaleKind, ScaleOptions};
pub use schema::{Coercion, Schema};
pub use theme::Theme;
pub use types::{Insets, RenderOptions};
