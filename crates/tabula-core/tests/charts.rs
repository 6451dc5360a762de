// File: crates/tabula-core/tests/charts.rs
// Purpose: Mount each chart kind on small datasets and check marks, rescaling on filter,
// dimension switching and per-chart failure isolation in dashboard configs.

use tabula_core::charts::{
    Bar, BarConfig, BarGroup, BarSeries, Heatmap, HeatmapConfig, Parallel, ParallelConfig, Radar, RadarConfig,
};
use tabula_core::config::{LOAD_ERROR_MESSAGE, RENDER_ERROR_MESSAGE};
use tabula_core::mark::Paint;
use tabula_core::scale::ScaleTransform;
use tabula_core::{
    load, Canvas, ChartError, Controller, DashboardConfig, DataContext, Insets, MarkKey, RenderOptions, Rgba, Schema,
    Shape, Theme,
};

const POKEMON: &str = "\
Name,Type_1,Generation,Attack,Defense
Charmander,Fire,1,60,40
Squirtle,Water,1,50,80
Torchic,Fire,3,80,60
Treecko,Grass,3,100,20
";

const STUDENTS: &str = "\
sex,studytime,G1,G2,G3,Walc,absences
F,2,5,6,6,1,6
F,2,5,5,6,1,4
F,2,7,8,10,3,10
M,3,14,14,15,2,0
M,1,11,12,11,1,2
M,4,12,12,12,1,0
";

fn pokemon() -> DataContext {
    let schema = Schema::new().number("Generation").number("Attack").number("Defense");
    DataContext::new("pokemon", load(POKEMON, &schema).unwrap())
}

fn students() -> DataContext {
    let schema = Schema::new().number("studytime").number("G1").number("G2").number("G3").number("Walc").number("absences");
    DataContext::new("students", load(STUDENTS, &schema).unwrap())
}

fn k(s: &str) -> MarkKey {
    MarkKey::from(s)
}

fn text_of(shape: &Shape) -> Option<&str> {
    match shape {
        Shape::Text { content, .. } => Some(content),
        _ => None,
    }
}

#[test]
fn heatmap_fills_missing_cells_with_zero() {
    let mut canvas = Canvas::new(800, 500, Theme::light());
    let config = HeatmapConfig {
        row_field: "Type_1".into(),
        column_field: "Generation".into(),
        column_format: "Gen {}".into(),
        ..HeatmapConfig::default()
    };
    let chart = Heatmap::mount(&mut canvas, &pokemon(), &config).unwrap();

    // 3 types x 2 generations
    assert_eq!(chart.groups().len(), 6);
    assert_eq!(chart.cells().len(&canvas), 6);
    assert_eq!(chart.x().domain(), ["1", "3"]);
    assert_eq!(chart.y().domain(), ["Fire", "Grass", "Water"]);

    let empty = chart.cells().mark(&canvas, &k("Water|3")).unwrap();
    assert_eq!(empty.style.fill, Paint::Solid(Theme::light().empty_cell));
    let label = chart.labels().mark(&canvas, &k("Water|3")).unwrap();
    assert_eq!(text_of(&label.shape), Some("0"));

    let fire = chart.cells().mark(&canvas, &k("Fire|1")).unwrap();
    assert_eq!(fire.title.as_deref(), Some("Fire, Gen 1: 1"));
    assert_eq!(chart.color().domain(), (0.0, 1.0));
}

#[test]
fn bar_rescales_and_retitles_on_filter() {
    let mut canvas = Canvas::new(800, 500, Theme::light());
    let series = ["G1", "G2", "G3"]
        .map(|f| BarSeries { field: f.into(), label: f.into(), color: Rgba::rgb(0x84, 0x5E, 0xC2) })
        .to_vec();
    let config = BarConfig {
        title: "Grades".into(),
        group_field: "studytime".into(),
        groups: ["1", "2", "3", "4"].map(|g| BarGroup { key: g.into(), label: format!("level {g}") }).to_vec(),
        series,
        filter_field: Some("sex".into()),
        filter_labels: vec![("F".into(), "Female".into())],
        ..BarConfig::default()
    };
    let mut ctl = Controller::new(Bar::mount(&mut canvas, &students(), &config).unwrap());
    assert_eq!(ctl.chart().bars().len(&canvas), 12);
    assert_eq!(ctl.chart().y_scale().domain(), (0.0, 16.0));

    ctl.filter_by_category(&mut canvas, Some("F")).unwrap();
    let keys: Vec<String> = ctl.chart().bars().keys(&canvas).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["2|G1", "2|G2", "2|G3"]);
    let (_, top) = ctl.chart().y_scale().domain();
    assert!(top >= 22.0 / 3.0 && top < 16.0, "{top}");

    let frame = canvas.layer(ctl.chart().frame_layer());
    let title = frame.find(&k("chart-title")).and_then(|m| text_of(&m.shape));
    assert_eq!(title, Some("Grades (Female)"));

    ctl.filter_by_category(&mut canvas, None).unwrap();
    assert_eq!(ctl.chart().bars().len(&canvas), 12);
    let title = canvas.layer(ctl.chart().frame_layer()).find(&k("chart-title")).and_then(|m| text_of(&m.shape));
    assert_eq!(title, Some("Grades"));
}

#[test]
fn radar_scales_each_feature_by_its_maximum() {
    let mut canvas = Canvas::new(600, 600, Theme::light());
    let config = RadarConfig {
        category_field: "Type_1".into(),
        features: vec!["Attack".into(), "Defense".into()],
        display: vec!["Water".into(), "Fire".into()],
        ..RadarConfig::default()
    };
    let mut ctl = Controller::new(Radar::mount(&mut canvas, &pokemon(), &config).unwrap());
    let chart = ctl.chart();
    let keys: Vec<String> = chart.polygons().keys(&canvas).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["Water", "Fire"]);
    assert_eq!(chart.dots().len(&canvas), 4);

    let r = chart.radius();
    let fire = chart.dots().mark(&canvas, &k("Fire|Attack")).unwrap();
    match fire.shape {
        Shape::Circle { cx, cy, .. } => {
            assert!(cx.abs() < 1e-9);
            assert!((cy + 0.7 * r).abs() < 1e-9, "{cy}");
        }
        ref other => panic!("unexpected shape {other:?}"),
    }
    let water = chart.dots().mark(&canvas, &k("Water|Defense")).unwrap();
    assert!(matches!(water.shape, Shape::Circle { cy, .. } if (cy - r).abs() < 1e-9));

    ctl.hover(&mut canvas, "Fire").unwrap();
    let (_, style) = ctl.chart().polygons().mark(&canvas, &k("Fire")).unwrap().appearance();
    assert_eq!(style.stroke_width, 3.0);
    let err = ctl.update_dimension(&mut canvas, 0, "Speed").unwrap_err();
    assert!(matches!(err, ChartError::UnknownField(_)));
}

#[test]
fn parallel_switches_dimensions_and_skips_unknown_fields() {
    let mut canvas = Canvas::new(700, 400, Theme::light());
    let config = ParallelConfig {
        dimensions: vec!["studytime".into(), "G3".into()],
        choices: vec!["studytime".into(), "G3".into(), "Walc".into(), "absences".into(), "shoe_size".into()],
        color_field: "G3".into(),
        filter_field: Some("G3".into()),
        ..ParallelConfig::default()
    };
    let mut ctl = Controller::new(Parallel::mount(&mut canvas, &students(), &config).unwrap());
    assert_eq!(ctl.chart().active_dimensions(), ["studytime", "G3"]);
    assert_eq!(ctl.chart().lines().len(&canvas), 6);
    assert!(ctl.chart().y_scale("shoe_size").is_none());
    assert_eq!(ctl.chart().x_scale().map("studytime"), Some(0.0));

    ctl.update_dimension(&mut canvas, 1, "Walc").unwrap();
    assert_eq!(ctl.chart().active_dimensions(), ["studytime", "Walc"]);
    let walc = *ctl.chart().y_scale("Walc").unwrap();
    let line = ctl.chart().lines().mark(&canvas, &k("2")).unwrap();
    match &line.shape {
        Shape::Path { points, closed } => {
            assert!(!closed);
            assert_eq!(points.len(), 2);
            assert!((points[1].1 - walc.map(3.0)).abs() < 1e-9);
        }
        other => panic!("unexpected shape {other:?}"),
    }

    assert!(matches!(ctl.update_dimension(&mut canvas, 0, "shoe_size"), Err(ChartError::UnknownField(_))));
    assert!(matches!(ctl.update_dimension(&mut canvas, 4, "G3"), Err(ChartError::DimensionIndex { index: 4, len: 2 })));

    ctl.filter_by_range(&mut canvas, 10.0, 20.0).unwrap();
    let keys: Vec<String> = ctl.chart().lines().keys(&canvas).iter().map(|k| k.to_string()).collect();
    assert_eq!(keys, ["2", "3", "4", "5"]);
}

#[test]
fn parallel_swap_to_an_active_field_keeps_the_full_width() {
    let mut canvas = Canvas::new(700, 400, Theme::light());
    let config = ParallelConfig {
        dimensions: vec!["studytime".into(), "G3".into(), "Walc".into()],
        color_field: "G3".into(),
        ..ParallelConfig::default()
    };
    let mut ctl = Controller::new(Parallel::mount(&mut canvas, &students(), &config).unwrap());
    ctl.update_dimension(&mut canvas, 2, "G3").unwrap();

    let x = ctl.chart().x_scale();
    let (_, right) = x.range();
    assert_eq!(x.domain(), ["studytime", "G3"]);
    assert_eq!(x.map("G3"), Some(right));
    match &ctl.chart().lines().mark(&canvas, &k("0")).unwrap().shape {
        Shape::Path { points, .. } => {
            let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
            assert_eq!(xs, [0.0, right, right]);
        }
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn charts_without_a_margin_use_the_canvas_insets() {
    let bar = |left: u32, margin: Option<Insets>| {
        let options = RenderOptions::sized(800, 500).with_insets(Insets::new(left, 20, 40, 60));
        let mut canvas = Canvas::from_options(&options);
        let config = BarConfig {
            group_field: "studytime".into(),
            series: vec![BarSeries { field: "G3".into(), label: "G3".into(), color: Rgba::rgb(0x84, 0x5E, 0xC2) }],
            margin,
            ..BarConfig::default()
        };
        let chart = Bar::mount(&mut canvas, &students(), &config).unwrap();
        (canvas.layer(chart.bars().layer()).origin, chart.x_scale().range())
    };

    let (narrow, narrow_range) = bar(10, None);
    let (wide, wide_range) = bar(300, None);
    assert_eq!(narrow.0, 10.0);
    assert_eq!(wide.0, 300.0);
    assert_eq!(narrow_range.1 - wide_range.1, 290.0);

    let (own, _) = bar(300, Some(Insets::new(50, 20, 40, 60)));
    assert_eq!(own.0, 50.0);
}

#[test]
fn heatmap_keeps_cells_whose_categories_contain_the_separator() {
    let text = "r,c\na|b,c\na,b|c\n";
    let data = DataContext::new("pipes", load(text, &Schema::new()).unwrap());
    let mut canvas = Canvas::new(600, 400, Theme::light());
    let config = HeatmapConfig { row_field: "r".into(), column_field: "c".into(), ..HeatmapConfig::default() };
    let chart = Heatmap::mount(&mut canvas, &data, &config).unwrap();

    assert_eq!(chart.cells().len(&canvas), 4);
    let filled = chart.cells().mark(&canvas, &MarkKey::compound(&["a|b", "c"])).unwrap();
    assert_ne!(filled.style.fill, Paint::Solid(Theme::light().empty_cell));
    let other = chart.cells().mark(&canvas, &MarkKey::compound(&["a", "b|c"])).unwrap();
    assert_ne!(other.style.fill, Paint::Solid(Theme::light().empty_cell));
}

#[test]
fn dashboard_isolates_failing_charts() {
    let dir = std::path::PathBuf::from("target/test_out/dashboard");
    std::fs::create_dir_all(&dir).unwrap();
    let csv = dir.join("students.csv");
    std::fs::write(&csv, STUDENTS).unwrap();
    let csv = std::fs::canonicalize(&csv).unwrap();

    let json = serde_json::json!({
        "title": "Students",
        "options": { "width": 600, "height": 400 },
        "datasets": [
            {
                "name": "students",
                "path": csv,
                "schema": [
                    { "name": "studytime", "coercion": { "kind": "number" } },
                    { "name": "G3", "coercion": { "kind": "number" } }
                ]
            },
            { "name": "broken", "path": "does/not/exist.csv" }
        ],
        "charts": [
            {
                "name": "grades",
                "dataset": "students",
                "chart": {
                    "kind": "bar",
                    "title": "Final grade",
                    "group_field": "studytime",
                    "series": [{ "field": "G3", "label": "G3", "color": "#845EC2" }],
                    "filter_field": "sex"
                },
                "events": [{ "event": "filter_category", "value": "M" }]
            },
            {
                "name": "missing",
                "dataset": "broken",
                "chart": { "kind": "heatmap", "row_field": "a", "column_field": "b" }
            },
            {
                "name": "bad-field",
                "dataset": "students",
                "chart": { "kind": "scatter", "x_field": "nope", "y_field": "G3", "color_field": "sex" }
            }
        ]
    });
    let config = DashboardConfig::from_json(&json.to_string()).unwrap();
    let rendered = config.render();
    assert_eq!(rendered.len(), 3);

    let grades = &rendered[0];
    assert!(grades.error.is_none());
    assert_eq!((grades.canvas.width(), grades.canvas.height()), (600, 400));
    let svg = grades.canvas.to_svg();
    assert!(svg.contains("Final grade (M)"), "{svg}");
    assert!(!svg.contains(LOAD_ERROR_MESSAGE));

    assert_eq!(rendered[1].error.as_deref(), Some(LOAD_ERROR_MESSAGE));
    assert!(rendered[1].canvas.to_svg().contains(LOAD_ERROR_MESSAGE));
    assert_eq!(rendered[2].error.as_deref(), Some(RENDER_ERROR_MESSAGE));

    let page = config.page(&rendered);
    assert_eq!(page.len(), 3);
    let html = page.render().unwrap();
    assert!(html.contains("<title>Students</title>"), "{html}");
    assert!(html.contains("Final grade (M)"));
}

#[test]
fn unknown_chart_kind_is_a_config_error() {
    let json = r#"{ "datasets": [], "charts": [{ "name": "x", "dataset": "d", "chart": { "kind": "pie" } }] }"#;
    assert!(matches!(DashboardConfig::from_json(json), Err(ChartError::Config(_))));
}
