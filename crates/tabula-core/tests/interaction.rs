// File: crates/tabula-core/tests/interaction.rs
// Purpose: Selection state machine as a pure reducer, and the controller driving a live chart.

use tabula_core::charts::{Annotation, Scatter, ScatterConfig};
use tabula_core::interaction::{EmphasisKind, Target};
use tabula_core::{
    load, reduce, Canvas, ChartError, Controller, DataContext, Effect, Event, Filter, InteractionState, MarkKey, Schema,
    Selection, Theme,
};

const STUDENTS: &str = "\
sex,age,studytime,Dalc,Walc,absences,G3
F,18,2,1,1,6,6
F,17,2,1,1,4,6
F,15,2,2,3,10,10
M,16,3,1,2,0,15
M,17,1,1,1,2,11
M,16,4,1,1,0,12
";

fn k(s: &str) -> MarkKey {
    MarkKey::from(s)
}

fn click(key: &str) -> Event {
    Event::Click(Target::Mark(k(key)))
}

#[test]
fn click_toggles_selection() {
    let idle = InteractionState::new(vec!["Walc".into(), "G3".into()]);
    let (selected, effects) = reduce(&idle, &click("a")).unwrap();
    assert_eq!(selected.selection, Selection::Selected(k("a")));
    assert_eq!(effects, vec![Effect::Emphasize(k("a"), EmphasisKind::Selected), Effect::Annotate(k("a"))]);

    let (back, effects) = reduce(&selected, &click("a")).unwrap();
    assert_eq!(back, idle);
    assert_eq!(effects, vec![Effect::Revert(k("a")), Effect::ClearAnnotation]);
}

#[test]
fn clicking_another_mark_reverts_the_old_one_first() {
    let state = InteractionState { selection: Selection::Selected(k("a")), ..InteractionState::default() };
    let (next, effects) = reduce(&state, &click("b")).unwrap();
    assert_eq!(next.selection, Selection::Selected(k("b")));
    assert_eq!(
        effects,
        vec![
            Effect::Revert(k("a")),
            Effect::ClearAnnotation,
            Effect::Emphasize(k("b"), EmphasisKind::Selected),
            Effect::Annotate(k("b")),
        ]
    );
}

#[test]
fn background_click_clears_and_is_a_noop_when_idle() {
    let state = InteractionState { selection: Selection::Selected(k("a")), ..InteractionState::default() };
    let (next, effects) = reduce(&state, &Event::Click(Target::Background)).unwrap();
    assert_eq!(next.selection, Selection::Idle);
    assert_eq!(effects, vec![Effect::Revert(k("a")), Effect::ClearAnnotation]);

    let (same, effects) = reduce(&next, &Event::Click(Target::Background)).unwrap();
    assert_eq!(same, next);
    assert!(effects.is_empty());
}

#[test]
fn reducer_never_touches_its_input() {
    let state = InteractionState::new(vec!["x".into()]);
    let before = state.clone();
    let _ = reduce(&state, &click("a")).unwrap();
    let _ = reduce(&state, &Event::DimensionChanged { index: 0, field: "y".into() }).unwrap();
    assert_eq!(state, before);
}

#[test]
fn hover_does_not_override_the_selected_style() {
    let state = InteractionState { selection: Selection::Selected(k("a")), ..InteractionState::default() };
    let (hovering, effects) = reduce(&state, &Event::PointerEnter(k("a"))).unwrap();
    assert_eq!(effects, vec![Effect::ShowTooltip(k("a"))]);
    let (_, effects) = reduce(&hovering, &Event::PointerLeave(k("a"))).unwrap();
    assert_eq!(effects, vec![Effect::HideTooltip]);

    let (hovering, effects) = reduce(&state, &Event::PointerEnter(k("b"))).unwrap();
    assert_eq!(effects, vec![Effect::Emphasize(k("b"), EmphasisKind::Hovered), Effect::ShowTooltip(k("b"))]);
    let (left, effects) = reduce(&hovering, &Event::PointerLeave(k("b"))).unwrap();
    assert_eq!(effects, vec![Effect::Revert(k("b")), Effect::HideTooltip]);
    assert_eq!(left.hovered, None);
}

#[test]
fn dimension_change_clears_selection_and_redraws() {
    let state = InteractionState {
        selection: Selection::Selected(k("a")),
        dimensions: vec!["Walc".into(), "G3".into()],
        ..InteractionState::default()
    };
    let (next, effects) = reduce(&state, &Event::DimensionChanged { index: 0, field: "Dalc".into() }).unwrap();
    assert_eq!(next.dimensions, ["Dalc", "G3"]);
    assert_eq!(next.selection, Selection::Idle);
    assert_eq!(effects, vec![Effect::Revert(k("a")), Effect::ClearAnnotation, Effect::Redraw]);

    let (same, effects) = reduce(&next, &Event::DimensionChanged { index: 0, field: "Dalc".into() }).unwrap();
    assert_eq!(same, next);
    assert!(effects.is_empty());

    let err = reduce(&next, &Event::DimensionChanged { index: 2, field: "x".into() }).unwrap_err();
    assert!(matches!(err, ChartError::DimensionIndex { index: 2, len: 2 }));
}

#[test]
fn filter_change_clears_selection_and_refilters() {
    let state = InteractionState { selection: Selection::Selected(k("a")), ..InteractionState::default() };
    let filter = Filter::Range { field: "G3".into(), min: 10.0, max: 20.0 };
    let (next, effects) = reduce(&state, &Event::FilterChanged(Some(filter.clone()))).unwrap();
    assert_eq!(next.filter, Some(filter.clone()));
    assert_eq!(effects, vec![Effect::Revert(k("a")), Effect::ClearAnnotation, Effect::Refilter]);

    let (_, effects) = reduce(&next, &Event::FilterChanged(Some(filter))).unwrap();
    assert!(effects.is_empty());
}

fn mount_scatter() -> (Canvas, Controller<Scatter>) {
    let schema = Schema::new().number("Dalc").number("Walc").number("absences").number("G3").number("age");
    let data = DataContext::new("students", load(STUDENTS, &schema).unwrap());
    let config = ScatterConfig {
        x_field: "Walc".into(),
        y_field: "G3".into(),
        x_domain: Some((0.0, 5.0)),
        y_domain: Some((0.0, 20.0)),
        color_field: "sex".into(),
        size_field: Some("absences".into()),
        annotation: Some(Annotation { field: "absences".into(), format: "Absences: {}".into() }),
        filter_field: Some("G3".into()),
        ..ScatterConfig::default()
    };
    let mut canvas = Canvas::new(800, 500, Theme::light());
    let chart = Scatter::mount(&mut canvas, &data, &config).unwrap();
    (canvas, Controller::new(chart))
}

#[test]
fn select_then_deselect_restores_every_mark() {
    let (mut canvas, mut ctl) = mount_scatter();
    let points = ctl.chart().points().layer();
    let initial = canvas.layer(points).clone();

    ctl.click(&mut canvas, "0").unwrap();
    let selected = canvas.find_mark(points, &k("0")).unwrap();
    assert!(selected.is_emphasized());
    let note = &canvas.layer(ctl.chart().annotation_layer()).marks;
    assert_eq!(note.len(), 1);
    assert!(matches!(&note[0].shape, tabula_core::Shape::Text { content, .. } if content == "Absences: 6"));

    ctl.click(&mut canvas, "0").unwrap();
    assert_eq!(canvas.layer(points), &initial);
    assert!(canvas.layer(ctl.chart().annotation_layer()).marks.is_empty());
}

#[test]
fn switching_the_x_variable_rebinds_and_clears() {
    let (mut canvas, mut ctl) = mount_scatter();
    ctl.click(&mut canvas, "2").unwrap();
    let effects = ctl.update_x_variable(&mut canvas, "Dalc").unwrap();
    assert!(effects.contains(&Effect::Redraw));
    assert_eq!(ctl.state().dimensions, ["Dalc", "G3"]);
    assert_eq!(ctl.state().selection, Selection::Idle);
    assert_eq!(ctl.chart().x_field(), "Dalc");

    let points = ctl.chart().points().layer();
    assert!(canvas.layer(points).marks.iter().all(|m| !m.is_emphasized()));
    let x = ctl.chart().x_scale();
    let mark = canvas.find_mark(points, &k("2")).unwrap();
    assert!(matches!(mark.shape, tabula_core::Shape::Circle { cx, .. } if (cx - x.map(2.0)).abs() < 1e-9));

    let err = ctl.update_x_variable(&mut canvas, "shoe_size").unwrap_err();
    assert!(matches!(err, ChartError::UnknownField(_)));
}

#[test]
fn range_filter_rejoins_by_record() {
    let (mut canvas, mut ctl) = mount_scatter();
    let points = ctl.chart().points().layer();
    assert_eq!(canvas.layer(points).marks.len(), 6);

    ctl.filter_by_range(&mut canvas, 11.0, 20.0).unwrap();
    let keys: Vec<String> = ctl.chart().points().keys(&canvas).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["3", "4", "5"]);

    ctl.filter_by_range(&mut canvas, 0.0, 20.0).unwrap();
    assert_eq!(canvas.layer(points).marks.len(), 6);
}

#[test]
fn hover_shows_and_hides_a_tooltip() {
    let (mut canvas, mut ctl) = mount_scatter();
    let tooltip = ctl.chart().tooltip_layer();
    ctl.hover(&mut canvas, "1").unwrap();
    assert!(canvas.find_mark(ctl.chart().points().layer(), &k("1")).unwrap().is_emphasized());
    ctl.leave(&mut canvas, "1").unwrap();
    assert!(canvas.layer(tooltip).marks.is_empty());
    assert!(!canvas.find_mark(ctl.chart().points().layer(), &k("1")).unwrap().is_emphasized());
}

#[test]
fn filtered_out_records_get_no_annotation_or_tooltip() {
    let (mut canvas, mut ctl) = mount_scatter();
    ctl.filter_by_range(&mut canvas, 11.0, 20.0).unwrap();

    // record 0 (G3 = 6) is hidden
    ctl.click(&mut canvas, "0").unwrap();
    assert_eq!(ctl.state().selection, Selection::Selected(k("0")));
    assert!(canvas.layer(ctl.chart().annotation_layer()).marks.is_empty());

    ctl.hover(&mut canvas, "1").unwrap();
    assert!(canvas.layer(ctl.chart().tooltip_layer()).marks.is_empty());

    ctl.click(&mut canvas, "3").unwrap();
    assert_eq!(canvas.layer(ctl.chart().annotation_layer()).marks.len(), 1);
}
