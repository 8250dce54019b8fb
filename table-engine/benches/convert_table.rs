//! FILENAME: table-engine/benches/convert_table.rs
//! Conversion throughput for a channel-style table on a 2D binning.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grid::{GridSource, Histogram};
use table_engine::{
    convert_table, ChannelSample, DependentFormatter, DependentVariableSpec, Header,
    IndependentVariableSpec, TableDefinition,
};

fn grid(nx: usize, ny: usize, scale: f64) -> Arc<dyn GridSource> {
    let contents = (0..nx * ny).map(|i| scale * (1.0 + i as f64)).collect();
    Arc::new(
        Histogram::new(
            "bench",
            vec![
                Histogram::uniform_edges(nx, 0.0, 1.0),
                Histogram::uniform_edges(ny, 0.0, 1.0),
            ],
            contents,
        )
        .unwrap(),
    )
}

fn build_table(nx: usize, ny: usize, systematics: usize) -> TableDefinition {
    let mut sample = ChannelSample::new("signal", grid(nx, ny, 1.0));
    for i in 0..systematics {
        sample = sample.with_systematic(format!("sys{}", i), grid(nx, ny, 1.1), grid(nx, ny, 0.9));
    }
    let column = table_engine::channel::sample_column("SR", &sample);

    TableDefinition::named("bench")
        .with_independent(IndependentVariableSpec::new(Header::new("x")))
        .with_independent(IndependentVariableSpec::new(Header::new("y")))
        .with_dependent(
            DependentVariableSpec::new(Header::new("Data"), DependentFormatter::default())
                .with_input("histo", grid(nx, ny, 1.0)),
        )
        .with_dependent(column)
}

fn bench_convert(c: &mut Criterion) {
    let small = build_table(10, 10, 5);
    c.bench_function("convert 10x10, 5 systematics", |b| {
        b.iter(|| convert_table(black_box(&small)).unwrap())
    });

    let large = build_table(100, 50, 20);
    c.bench_function("convert 100x50, 20 systematics", |b| {
        b.iter(|| convert_table(black_box(&large)).unwrap())
    });
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
