// File: crates/tabula-core/src/interaction.rs
// Summary: Interaction state machine: a pure reducer producing (state, effects) and the
// controller that applies effects to a chart synchronously.

use serde::Deserialize;
use tracing::debug;

use crate::canvas::Canvas;
use crate::error::{ChartError, Result};
use crate::mark::MarkKey;
use crate::record::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(MarkKey),
}

impl Selection {
    pub fn key(&self) -> Option<&MarkKey> {
        match self {
            Selection::Idle => None,
            Selection::Selected(k) => Some(k),
        }
    }

    pub fn is_selected(&self, key: &MarkKey) -> bool {
        self.key() == Some(key)
    }
}

/// Predicate deciding which records are visible.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Inclusive numeric range; missing values never match.
    Range { field: String, min: f64, max: f64 },
    Equals { field: String, value: String },
}

impl Filter {
    pub fn field(&self) -> &str {
        match self {
            Filter::Range { field, .. } | Filter::Equals { field, .. } => field,
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Filter::Range { min, max, .. } => {
                let v = value.as_number();
                !v.is_nan() && v >= *min && v <= *max
            }
            Filter::Equals { value: want, .. } => value.as_text() == want.as_str(),
        }
    }
}

/// Ephemeral UI state of one chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub selection: Selection,
    pub hovered: Option<MarkKey>,
    /// Active field per dimension slot (x variable, parallel axes, ...).
    pub dimensions: Vec<String>,
    pub filter: Option<Filter>,
}

impl InteractionState {
    pub fn new(dimensions: Vec<String>) -> Self {
        Self { dimensions, ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Mark(MarkKey),
    Background,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Click(Target),
    PointerEnter(MarkKey),
    PointerLeave(MarkKey),
    DimensionChanged { index: usize, field: String },
    FilterChanged(Option<Filter>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmphasisKind {
    Selected,
    Hovered,
}

/// Visual side effect requested by a transition, applied in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Revert(MarkKey),
    Emphasize(MarkKey, EmphasisKind),
    Annotate(MarkKey),
    ClearAnnotation,
    ShowTooltip(MarkKey),
    HideTooltip,
    /// Axes and marks must be rebuilt for the new dimensions.
    Redraw,
    /// The visible subset changed; rejoin marks.
    Refilter,
}

/// Drop the selection and hover, reverting whatever they emphasized.
fn clear_transient(next: &mut InteractionState, effects: &mut Vec<Effect>) {
    if let Selection::Selected(old) = std::mem::take(&mut next.selection) {
        effects.push(Effect::Revert(old));
        effects.push(Effect::ClearAnnotation);
    }
    if let Some(old) = next.hovered.take() {
        effects.push(Effect::Revert(old));
        effects.push(Effect::HideTooltip);
    }
}

/// Pure transition function. The input state is never modified.
///
/// Errors only for a dimension index outside the active dimensions.
pub fn reduce(state: &InteractionState, event: &Event) -> Result<(InteractionState, Vec<Effect>)> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        Event::Click(Target::Mark(key)) => match &state.selection {
            Selection::Selected(current) if current == key => {
                next.selection = Selection::Idle;
                effects.push(Effect::Revert(key.clone()));
                effects.push(Effect::ClearAnnotation);
            }
            selection => {
                if let Selection::Selected(old) = selection {
                    effects.push(Effect::Revert(old.clone()));
                    effects.push(Effect::ClearAnnotation);
                }
                next.selection = Selection::Selected(key.clone());
                effects.push(Effect::Emphasize(key.clone(), EmphasisKind::Selected));
                effects.push(Effect::Annotate(key.clone()));
            }
        },
        Event::Click(Target::Background) => {
            if let Selection::Selected(old) = &state.selection {
                next.selection = Selection::Idle;
                effects.push(Effect::Revert(old.clone()));
                effects.push(Effect::ClearAnnotation);
            }
        }
        Event::PointerEnter(key) => {
            if let Some(old) = &state.hovered {
                if old != key && !state.selection.is_selected(old) {
                    effects.push(Effect::Revert(old.clone()));
                }
            }
            next.hovered = Some(key.clone());
            if !state.selection.is_selected(key) {
                effects.push(Effect::Emphasize(key.clone(), EmphasisKind::Hovered));
            }
            effects.push(Effect::ShowTooltip(key.clone()));
        }
        Event::PointerLeave(key) => {
            if state.hovered.as_ref() == Some(key) {
                next.hovered = None;
                if !state.selection.is_selected(key) {
                    effects.push(Effect::Revert(key.clone()));
                }
                effects.push(Effect::HideTooltip);
            }
        }
        Event::DimensionChanged { index, field } => {
            let len = state.dimensions.len();
            let current = state.dimensions.get(*index).ok_or(ChartError::DimensionIndex { index: *index, len })?;
            if current != field {
                clear_transient(&mut next, &mut effects);
                next.dimensions[*index] = field.clone();
                effects.push(Effect::Redraw);
            }
        }
        Event::FilterChanged(filter) => {
            if &state.filter != filter {
                clear_transient(&mut next, &mut effects);
                next.filter = filter.clone();
                effects.push(Effect::Refilter);
            }
        }
    }

    Ok((next, effects))
}

/// A chart that can carry out interaction effects on its canvas.
pub trait InteractiveChart {
    /// Dimension slots at mount time.
    fn dimensions(&self) -> Vec<String>;

    /// Reject a field before it reaches the state machine.
    fn check_field(&self, field: &str) -> Result<()>;

    /// Field that `filter_by_range` / `filter_by_category` filter on.
    fn filter_field(&self) -> Option<&str>;

    /// Carry out one effect. `state` is the state after the transition.
    fn apply(&mut self, canvas: &mut Canvas, state: &InteractionState, effect: &Effect) -> Result<()>;
}

/// Owns one chart's interaction state. Every event runs to completion,
/// including all of its effects, before the next one is accepted.
pub struct Controller<C> {
    chart: C,
    state: InteractionState,
}

impl<C: InteractiveChart> Controller<C> {
    pub fn new(chart: C) -> Self {
        let state = InteractionState::new(chart.dimensions());
        Self { chart, state }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    pub fn into_chart(self) -> C {
        self.chart
    }

    pub fn dispatch(&mut self, canvas: &mut Canvas, event: Event) -> Result<Vec<Effect>> {
        let (next, effects) = reduce(&self.state, &event)?;
        self.state = next;
        for effect in &effects {
            self.chart.apply(canvas, &self.state, effect)?;
        }
        debug!(?event, effects = effects.len(), "interaction");
        Ok(effects)
    }

    pub fn click(&mut self, canvas: &mut Canvas, key: impl Into<MarkKey>) -> Result<Vec<Effect>> {
        self.dispatch(canvas, Event::Click(Target::Mark(key.into())))
    }

    pub fn click_background(&mut self, canvas: &mut Canvas) -> Result<Vec<Effect>> {
        self.dispatch(canvas, Event::Click(Target::Background))
    }

    pub fn hover(&mut self, canvas: &mut Canvas, key: impl Into<MarkKey>) -> Result<Vec<Effect>> {
        self.dispatch(canvas, Event::PointerEnter(key.into()))
    }

    pub fn leave(&mut self, canvas: &mut Canvas, key: impl Into<MarkKey>) -> Result<Vec<Effect>> {
        self.dispatch(canvas, Event::PointerLeave(key.into()))
    }

    /// Radio-button callback: the x variable is dimension slot 0.
    pub fn update_x_variable(&mut self, canvas: &mut Canvas, field: &str) -> Result<Vec<Effect>> {
        self.update_dimension(canvas, 0, field)
    }

    /// Dropdown callback for one dimension slot.
    pub fn update_dimension(&mut self, canvas: &mut Canvas, index: usize, field: &str) -> Result<Vec<Effect>> {
        self.chart.check_field(field)?;
        self.dispatch(canvas, Event::DimensionChanged { index, field: field.to_string() })
    }

    /// Range-slider callback on the chart's filter field.
    pub fn filter_by_range(&mut self, canvas: &mut Canvas, min: f64, max: f64) -> Result<Vec<Effect>> {
        let field = self.filter_target()?;
        self.dispatch(canvas, Event::FilterChanged(Some(Filter::Range { field, min, max })))
    }

    /// Category filter on the chart's filter field; `None` shows everything.
    pub fn filter_by_category(&mut self, canvas: &mut Canvas, value: Option<&str>) -> Result<Vec<Effect>> {
        let filter = match value {
            Some(v) => Some(Filter::Equals { field: self.filter_target()?, value: v.to_string() }),
            None => None,
        };
        self.dispatch(canvas, Event::FilterChanged(filter))
    }

    fn filter_target(&self) -> Result<String> {
        self.chart
            .filter_field()
            .map(str::to_string)
            .ok_or_else(|| ChartError::UnknownField("<filter>".to_string()))
    }
}
