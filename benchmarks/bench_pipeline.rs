use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use logtally::event::{parse_timestamp, ErrorEvent};
use logtally::pipeline::run_pipeline;

fn synthetic_events(n: usize) -> Vec<ErrorEvent> {
    let severities = ["Critical", "Warning", "Info"];
    let products = ["Atlas", "Borealis", "Cobalt", "Drift"];
    (0..n)
        .map(|i| ErrorEvent {
            timestamp: parse_timestamp(&format!("2024-03-01 {:02}:15:00", i % 24)),
            severity: severities[i % severities.len()].to_string(),
            product: products[i % products.len()].to_string(),
            version: format!("1.{}", i % 3),
            error_code: format!("E{:03}", i % 40),
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let events = synthetic_events(10_000);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("four_rollups_10k", |b| {
        b.iter(|| {
            let source = events.iter().cloned().map(Ok::<_, anyhow::Error>);
            black_box(run_pipeline(source).unwrap())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
