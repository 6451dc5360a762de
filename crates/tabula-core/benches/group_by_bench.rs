use std::fmt::Write as _;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tabula_core::aggregate::{distinct, fill_cross_product};
use tabula_core::{group_by, load, CategoryKey, GroupOrder, Metric, Record, RecordSet, Schema};

const TYPES: [&str; 8] = ["Fire", "Water", "Grass", "Bug", "Normal", "Psychic", "Rock", "Ghost"];

fn build_set(n: usize) -> RecordSet {
    let mut text = String::from("Type_1,Generation,Attack\n");
    for i in 0..n {
        let _ = writeln!(text, "{},{},{}", TYPES[i % TYPES.len()], 1 + i % 7, 20 + (i * 37) % 150);
    }
    load(&text, &Schema::new().number("Generation").number("Attack")).unwrap_or_else(|e| panic!("bench data: {e}"))
}

fn bench_group_by(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");
    for &n in &[1_000usize, 50_000usize] {
        let set = build_set(n);
        let t = set.column("Type_1").unwrap_or_else(|e| panic!("{e}"));
        let g = set.column("Generation").unwrap_or_else(|e| panic!("{e}"));
        let attack = set.column("Attack").unwrap_or_else(|e| panic!("{e}"));

        group.bench_function(format!("count_cross_{n}"), |b| {
            b.iter(|| {
                let key = |r: &Record| (CategoryKey::from(t.text(r)), CategoryKey::from(g.text(r)));
                let counted = group_by(set.iter(), key, &[Metric::count("count")], GroupOrder::Ascending);
                let rows = distinct(set.iter(), |r| key(r).0);
                let cols = distinct(set.iter(), |r| key(r).1);
                black_box(fill_cross_product(counted, &rows, &cols));
            });
        });
        group.bench_function(format!("mean_{n}"), |b| {
            b.iter(|| {
                let metrics = [Metric::mean("Attack", |r: &Record| attack.number(r))];
                black_box(group_by(set.iter(), |r| CategoryKey::from(t.text(r)), &metrics, GroupOrder::Ascending));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_group_by);
criterion_main!(benches);
