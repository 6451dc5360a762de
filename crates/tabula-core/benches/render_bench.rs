use std::fmt::Write as _;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabula_core::charts::{Scatter, ScatterConfig};
use tabula_core::{load, Canvas, DataContext, Schema, Theme};

fn build_data(n: usize) -> DataContext {
    let mut text = String::from("sex,Walc,G3,absences\n");
    for i in 0..n {
        let sex = if i % 2 == 0 { "F" } else { "M" };
        let _ = writeln!(text, "{sex},{},{},{}", 1 + i % 5, (i * 7) % 21, (i * 3) % 40);
    }
    let schema = Schema::new().number("Walc").number("G3").number("absences");
    DataContext::new("bench", load(&text, &schema).unwrap_or_else(|e| panic!("bench data: {e}")))
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scatter");
    for &n in &[1_000usize, 10_000usize] {
        let data = build_data(n);
        let config = ScatterConfig {
            x_field: "Walc".into(),
            y_field: "G3".into(),
            color_field: "sex".into(),
            size_field: Some("absences".into()),
            filter_field: Some("G3".into()),
            ..ScatterConfig::default()
        };
        group.bench_function(format!("mount_svg_{n}"), |b| {
            b.iter(|| {
                let mut canvas = Canvas::new(800, 500, Theme::light());
                let chart = Scatter::mount(&mut canvas, &data, &config).unwrap_or_else(|e| panic!("{e}"));
                black_box(chart);
                black_box(canvas.to_svg());
            });
        });
        group.bench_function(format!("refilter_{n}"), |b| {
            let mut canvas = Canvas::new(800, 500, Theme::light());
            let chart = Scatter::mount(&mut canvas, &data, &config).unwrap_or_else(|e| panic!("{e}"));
            let mut ctl = tabula_core::Controller::new(chart);
            let mut lo = 0.0;
            b.iter(|| {
                lo = if lo == 0.0 { 10.0 } else { 0.0 };
                black_box(ctl.filter_by_range(&mut canvas, lo, 20.0).unwrap_or_else(|e| panic!("{e}")));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
