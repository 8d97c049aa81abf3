//! Simple throughput benchmarks - parsing speed against serde_json

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::Value;
use slotjson::{DeserializationOptions, JsonDocument, deserialize_json, deserialize_json_in_place};
use slotjson_bench::{MEDIUM_JSON, SMALL_JSON, generate_catalog_json};
use std::hint::black_box;
use std::time::Duration;

fn payloads() -> Vec<(&'static str, String)> {
    vec![
        ("small", SMALL_JSON.to_string()),
        ("medium", MEDIUM_JSON.to_string()),
        ("large", generate_catalog_json(1000)),
    ]
}

fn benchmark_serde_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("serde_json");
    group.measurement_time(Duration::from_secs(5));

    for (name, input) in payloads() {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| {
                let value: Value = serde_json::from_str(black_box(input)).unwrap();
                black_box(value)
            })
        });
    }
    group.finish();
}

fn benchmark_slotjson_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("slotjson_copy");
    group.measurement_time(Duration::from_secs(5));

    for (name, input) in payloads() {
        let mut doc = JsonDocument::dynamic(input.len() * 4);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            b.iter(|| {
                deserialize_json(&mut doc, black_box(input), DeserializationOptions::default())
                    .unwrap();
                black_box(doc.memory_usage())
            })
        });
    }
    group.finish();
}

fn benchmark_slotjson_in_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("slotjson_in_place");
    group.measurement_time(Duration::from_secs(5));

    for (name, input) in payloads() {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, input| {
            let mut doc = JsonDocument::dynamic(input.len() * 4);
            b.iter(|| {
                deserialize_json_in_place(
                    &mut doc,
                    black_box(input.as_str()),
                    DeserializationOptions::default(),
                )
                .unwrap();
                black_box(doc.memory_usage())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_serde_json,
    benchmark_slotjson_copy,
    benchmark_slotjson_in_place
);
criterion_main!(benches);
