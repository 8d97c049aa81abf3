//! Document benchmarks - building, serializing and clearing trees

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use slotjson::{
    DeserializationOptions, DummyWriter, JsonDocument, deserialize_json, measure_json,
    serialize_json, serialize_json_pretty,
};
use slotjson_bench::{build_catalog, generate_catalog_json};
use std::hint::black_box;

const SIZES: [usize; 3] = [10, 100, 1000];

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for count in SIZES {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("fixed", count), &count, |b, &count| {
            let mut doc = JsonDocument::fixed(count * 1024);
            b.iter(|| {
                assert!(build_catalog(&mut doc, black_box(count)));
                black_box(doc.memory_usage())
            })
        });
        group.bench_with_input(BenchmarkId::new("growable", count), &count, |b, &count| {
            b.iter(|| {
                let mut doc = JsonDocument::dynamic(256);
                assert!(build_catalog(&mut doc, black_box(count)));
                black_box(doc.capacity())
            })
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    for count in SIZES {
        let mut doc = JsonDocument::dynamic(1024);
        let input = generate_catalog_json(count);
        deserialize_json(&mut doc, &input, DeserializationOptions::default()).unwrap();
        let len = measure_json(&doc);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("compact", count), &doc, |b, doc| {
            let mut out = String::with_capacity(len);
            b.iter(|| {
                out.clear();
                black_box(serialize_json(doc, &mut out))
            })
        });
        group.bench_with_input(BenchmarkId::new("pretty", count), &doc, |b, doc| {
            b.iter(|| black_box(serialize_json_pretty(doc, DummyWriter)))
        });
        group.bench_with_input(BenchmarkId::new("measure", count), &doc, |b, doc| {
            b.iter(|| black_box(measure_json(doc)))
        });
        group.bench_with_input(BenchmarkId::new("serde_json", count), &doc, |b, doc| {
            b.iter(|| black_box(serde_json::to_string(doc).unwrap()))
        });
    }
    group.finish();
}

fn benchmark_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("clear");

    for count in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut doc = JsonDocument::fixed(count * 1024);
            b.iter(|| {
                assert!(build_catalog(&mut doc, count));
                doc.clear();
                black_box(doc.is_null())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_serialize, benchmark_clear);
criterion_main!(benches);
