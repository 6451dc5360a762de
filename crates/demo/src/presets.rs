// File: crates/demo/src/presets.rs
// Summary: Dashboard presets for the Pokemon and student-performance datasets.

use std::path::PathBuf;

use tabula_core::charts::{
    pokemon_type_colors, Annotation, BarConfig, BarGroup, BarSeries, HeatmapConfig, ParallelConfig, RadarConfig,
    ScatterConfig, TooltipField,
};
use tabula_core::config::{ChartConfig, DatasetConfig};
use tabula_core::{ChartSpec, DashboardConfig, Insets, Interaction, RenderOptions, Rgba, Schema};

const FEMALE: Rgba = Rgba::rgb(0xFF, 0x5C, 0x8D);
const MALE: Rgba = Rgba::rgb(0x2E, 0x86, 0xC1);

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn chart(name: &str, dataset: &str, options: RenderOptions, spec: ChartSpec) -> ChartConfig {
    ChartConfig { name: name.into(), dataset: dataset.into(), options: Some(options), chart: spec, events: Vec::new() }
}

pub fn pokemon_schema() -> Schema {
    let numeric = ["Number", "Total", "HP", "Attack", "Defense", "Sp_Atk", "Sp_Def", "Speed", "Generation", "Weight_kg"];
    numeric.into_iter().fold(Schema::new(), |schema, field| schema.number(field)).boolean("isLegendary")
}

pub fn students_schema() -> Schema {
    let numeric = [
        "age", "studytime", "freetime", "goout", "Dalc", "Walc", "health", "famrel", "absences", "G1", "G2", "G3",
    ];
    numeric.into_iter().fold(Schema::new(), |schema, field| schema.number(field))
}

/// Type distribution heatmap, weight vs. total scatter and a per-type stat radar.
pub fn pokemon(data: PathBuf) -> DashboardConfig {
    let heatmap = HeatmapConfig {
        title: "Pokemon Type Distribution by Generation (Overview)".into(),
        row_field: "Type_1".into(),
        column_field: "Generation".into(),
        row_label: "Type".into(),
        column_label: "Generation".into(),
        column_format: "Gen {}".into(),
        legend_title: "Number of Pokemon".into(),
        note: Some("Note: Some types were not introduced in early generations".into()),
        margin: Some(Insets::new(100, 50, 60, 110)),
        ..HeatmapConfig::default()
    };
    let scatter = ScatterConfig {
        title: "Pokemon Weight vs Total Stats".into(),
        x_field: "Weight_kg".into(),
        y_field: "Total".into(),
        axis_labels: pairs(&[("Weight_kg", "Weight (kg)"), ("Total", "Total Base Stats")]),
        color_field: "Type_1".into(),
        colors: pokemon_type_colors(),
        legend_title: "Primary Types(Top 12)".into(),
        legend_top: Some(12),
        legend_note: Some("Pokemon with high Total stats are often Legendary Pokemon".into()),
        outline: Some(Rgba::rgb(0x33, 0x33, 0x33)),
        tooltip: vec![
            TooltipField { label: "Name".into(), field: "Name".into(), suffix: String::new() },
            TooltipField { label: "Type".into(), field: "Type_1".into(), suffix: String::new() },
            TooltipField { label: "Total".into(), field: "Total".into(), suffix: String::new() },
        ],
        note: Some("Note: Scatter plot shows relationship between Weight and Total Base Stats colored by Primary Type".into()),
        margin: Some(Insets::new(50, 180, 60, 80)),
        ..ScatterConfig::default()
    };
    let radar = RadarConfig {
        title: "Average Base Stats by Pokemon Type".into(),
        category_field: "Type_1".into(),
        features: ["HP", "Attack", "Defense", "Sp_Atk", "Sp_Def", "Speed"].map(String::from).to_vec(),
        display: ["Water", "Fire", "Grass", "Electric", "Psychic", "Dragon"].map(String::from).to_vec(),
        colors: pokemon_type_colors(),
        legend_title: "Pokemon Types".into(),
        note: Some("Star plot compares average base stats for different Pokemon types".into()),
        margin: Some(Insets::new(60, 140, 60, 80)),
        ..RadarConfig::default()
    };

    DashboardConfig {
        title: "Pokemon Data Visualization Dashboard".into(),
        options: RenderOptions::default(),
        datasets: vec![DatasetConfig { name: "pokemon".into(), path: data, schema: pokemon_schema(), delimiter: None }],
        charts: vec![
            chart("heatmap", "pokemon", RenderOptions::sized(800, 900), ChartSpec::Heatmap(heatmap)),
            chart("scatter", "pokemon", RenderOptions::sized(900, 500), ChartSpec::Scatter(scatter)),
            chart("radar", "pokemon", RenderOptions::sized(900, 500), ChartSpec::Radar(radar)),
        ],
    }
}

/// UI events for the student dashboard, routed to the chart that owns each control.
#[derive(Clone, Debug, Default)]
pub struct StudentEvents {
    pub x_variable: Option<String>,
    pub select: Option<String>,
    pub gender: Option<String>,
    pub min_grade: Option<f64>,
    pub dimensions: Vec<(usize, String)>,
}

/// Alcohol vs. grade scatter, study-time bar chart and parallel coordinates.
pub fn students(data: PathBuf, events: &StudentEvents) -> DashboardConfig {
    let scatter = ScatterConfig {
        title: "Relationship Between Weekend Alcohol Consumption and Academic Performance".into(),
        x_field: "Walc".into(),
        y_field: "G3".into(),
        axis_labels: pairs(&[
            ("Walc", "Weekend Alcohol Consumption (1-5)"),
            ("Dalc", "Workday Alcohol Consumption (1-5)"),
            ("G3", "Final Grade (0-20)"),
        ]),
        x_domain: Some((0.0, 5.0)),
        y_domain: Some((0.0, 20.0)),
        color_field: "sex".into(),
        colors: vec![("F".into(), FEMALE), ("M".into(), MALE)],
        category_labels: pairs(&[("F", "Female"), ("M", "Male")]),
        legend_title: "Gender".into(),
        size_field: Some("absences".into()),
        size_legend_title: "Absences".into(),
        opacity: 0.7,
        plot_background: true,
        grid: true,
        tooltip: [
            ("Gender", "sex", ""),
            ("Age", "age", ""),
            ("Weekend Alcohol", "Walc", "/5"),
            ("Workday Alcohol", "Dalc", "/5"),
            ("Final Grade", "G3", "/20"),
            ("Absences", "absences", ""),
            ("Study Time", "studytime", "/4"),
        ]
        .map(|(label, field, suffix)| TooltipField { label: label.into(), field: field.into(), suffix: suffix.into() })
        .to_vec(),
        annotation: Some(Annotation { field: "absences".into(), format: "Absences: {}".into() }),
        note: Some("* Click on a circle to see the number of absences".into()),
        margin: Some(Insets::new(80, 80, 60, 80)),
        ..ScatterConfig::default()
    };
    let bar = BarConfig {
        title: "Study Time vs. Alcohol Consumption".into(),
        group_field: "studytime".into(),
        groups: [("1", "<2 hours"), ("2", "2-5 hours"), ("3", "5-10 hours"), ("4", ">10 hours")]
            .map(|(key, label)| BarGroup { key: key.into(), label: label.into() })
            .to_vec(),
        series: vec![
            BarSeries { field: "Walc".into(), label: "Weekend Alcohol".into(), color: Rgba::rgb(0xFF, 0x96, 0x71) },
            BarSeries { field: "Dalc".into(), label: "Workday Alcohol".into(), color: Rgba::rgb(0x84, 0x5E, 0xC2) },
        ],
        x_label: "Weekly Study Time".into(),
        y_label: "Average Alcohol Consumption (1-5)".into(),
        filter_field: Some("sex".into()),
        filter_labels: pairs(&[("F", "Female"), ("M", "Male")]),
        filtered_title: "{title} ({filter} Students)".into(),
        margin: Some(Insets::new(60, 30, 50, 70)),
        ..BarConfig::default()
    };
    let parallel = ParallelConfig {
        title: "Parallel Coordinates View of Student Attributes".into(),
        dimensions: ["studytime", "freetime", "goout", "Walc", "Dalc", "G3"].map(String::from).to_vec(),
        choices: [
            "studytime", "freetime", "goout", "Walc", "Dalc", "G3", "G1", "G2", "absences", "health", "famrel",
        ]
        .map(String::from)
        .to_vec(),
        labels: pairs(&[
            ("studytime", "Study Time"),
            ("freetime", "Free Time"),
            ("goout", "Going Out"),
            ("Walc", "Weekend Alcohol"),
            ("Dalc", "Workday Alcohol"),
            ("G3", "Final Grade"),
            ("G1", "First Period Grade"),
            ("G2", "Second Period Grade"),
            ("absences", "Absences"),
            ("health", "Health Status"),
            ("famrel", "Family Relationship"),
        ]),
        color_field: "G3".into(),
        colors: (FEMALE, MALE),
        filter_field: Some("G3".into()),
        margin: Some(Insets::new(50, 50, 50, 40)),
        ..ParallelConfig::default()
    };

    let mut scatter = chart("scatter", "students", RenderOptions::sized(900, 560), ChartSpec::Scatter(scatter));
    let mut bar = chart("bar", "students", RenderOptions::sized(700, 450), ChartSpec::Bar(bar));
    let mut parallel = chart("parallel", "students", RenderOptions::sized(1000, 450), ChartSpec::Parallel(parallel));

    if let Some(field) = &events.x_variable {
        scatter.events.push(Interaction::XVariable { field: field.clone() });
    }
    if let Some(key) = &events.select {
        scatter.events.push(Interaction::Click { key: key.clone() });
    }
    if let Some(gender) = &events.gender {
        bar.events.push(Interaction::FilterCategory { value: Some(gender.clone()) });
    }
    for (index, field) in &events.dimensions {
        parallel.events.push(Interaction::Dimension { index: *index, field: field.clone() });
    }
    if let Some(min) = events.min_grade {
        parallel.events.push(Interaction::FilterRange { min, max: 20.0 });
    }

    DashboardConfig {
        title: "Student Alcohol Consumption and Academic Performance".into(),
        options: RenderOptions::default(),
        datasets: vec![DatasetConfig { name: "students".into(), path: data, schema: students_schema(), delimiter: None }],
        charts: vec![scatter, bar, parallel],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_events_land_on_their_charts() {
        let events = StudentEvents {
            x_variable: Some("Dalc".into()),
            select: Some("3".into()),
            gender: Some("F".into()),
            min_grade: Some(10.0),
            dimensions: vec![(1, "absences".into())],
        };
        let config = students(PathBuf::from("student-mat.csv"), &events);
        let by_name = |n: &str| config.charts.iter().find(|c| c.name == n).map(|c| c.events.clone()).unwrap_or_default();
        assert_eq!(
            by_name("scatter"),
            vec![Interaction::XVariable { field: "Dalc".into() }, Interaction::Click { key: "3".into() }]
        );
        assert_eq!(by_name("bar"), vec![Interaction::FilterCategory { value: Some("F".into()) }]);
        assert_eq!(
            by_name("parallel"),
            vec![
                Interaction::Dimension { index: 1, field: "absences".into() },
                Interaction::FilterRange { min: 10.0, max: 20.0 },
            ]
        );
    }

    #[test]
    fn pokemon_schema_types_the_stat_columns() {
        let schema = pokemon_schema();
        assert_eq!(schema.coercion("Attack"), Some(&tabula_core::Coercion::Number));
        assert!(matches!(schema.coercion("isLegendary"), Some(tabula_core::Coercion::Boolean { .. })));
    }
}
