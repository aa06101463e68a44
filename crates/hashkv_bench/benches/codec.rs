//! Snapshot codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashkv_bench::generate_snapshot;
use hashkv_codec::{Decode, Encode};
use hashkv_core::Key;
use std::collections::BTreeMap;

/// Benchmark encoding snapshots of growing size.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_snapshot");

    for count in [10usize, 100, 1_000, 10_000] {
        let snapshot = generate_snapshot(count, 32);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &snapshot, |b, snapshot| {
            b.iter(|| black_box(snapshot.encode().unwrap()));
        });
    }

    group.finish();
}

/// Benchmark decoding snapshots of growing size.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_snapshot");

    for count in [10usize, 100, 1_000, 10_000] {
        let bytes = generate_snapshot(count, 32).encode().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| black_box(BTreeMap::<Key, String>::decode(black_box(bytes)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
