//! Record cache benchmarks for multiselect
//!
//! These benchmarks measure population, prefix counting and consumption of
//! the composite-key trie, which dominate the cost of a multi-record select.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use multiselect::{RecordCache, RecordSpec, Value};
use multiselect::records::Record;
use multiselect::types::DataType;

fn spec() -> RecordSpec {
    let mut spec = RecordSpec::new();
    spec.add("run_id", DataType::Int4).unwrap();
    spec.add("lumi_id", DataType::Int4).unwrap();
    spec.add("value", DataType::Int8).unwrap();
    spec
}

fn record(spec: &RecordSpec, run: i32, lumi: i32) -> Record {
    let mut record = Record::new(spec);
    record.set(0, Value::Int4(run)).unwrap();
    record.set(1, Value::Int4(lumi)).unwrap();
    record.set(2, Value::Int8(i64::from(run) * 1000 + i64::from(lumi))).unwrap();
    record
}

fn populated(spec: &RecordSpec, runs: i32, lumis: i32) -> RecordCache {
    let mut cache = RecordCache::with_depth(2);
    for run in 0..runs {
        for lumi in 0..lumis {
            cache.push(&[run, lumi], record(spec, run, lumi)).unwrap();
        }
    }
    cache
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_push");
    let spec = spec();

    for lumis in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("runs_10", lumis), &lumis, |b, &lumis| {
            b.iter(|| black_box(populated(&spec, 10, lumis)));
        });
    }

    group.finish();
}

fn bench_branch_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_branch_size");
    let spec = spec();
    let cache = populated(&spec, 100, 100);

    group.bench_function("root", |b| {
        b.iter(|| black_box(cache.branch_size(black_box(&[]), 0).unwrap()));
    });

    group.bench_function("one_level", |b| {
        b.iter(|| black_box(cache.branch_size(black_box(&[50]), 1).unwrap()));
    });

    group.bench_function("full_key", |b| {
        b.iter(|| black_box(cache.branch_size(black_box(&[50, 50]), 2).unwrap()));
    });

    group.finish();
}

fn bench_lookup_and_clear(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_lookup_and_clear");
    let spec = spec();

    group.bench_function("drain_100x100", |b| {
        b.iter_batched(
            || populated(&spec, 100, 100),
            |mut cache| {
                for run in 0..100 {
                    for lumi in 0..100 {
                        black_box(cache.lookup_and_clear(&[run, lumi]).unwrap());
                    }
                }
                cache
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function("miss", |b| {
        let mut cache = populated(&spec, 10, 10);
        b.iter(|| black_box(cache.lookup_and_clear(black_box(&[99, 99])).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_branch_size, bench_lookup_and_clear);
criterion_main!(benches);
