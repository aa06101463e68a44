//! Artifact and mirror benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashkv_storage::{
    ArtifactBackend, DirectoryMirror, FileArtifact, InMemoryArtifact, InMemoryMirror,
    RemoteMirror,
};

const SIZES: [usize; 3] = [1024, 64 * 1024, 1024 * 1024];

/// Benchmark whole-artifact replacement.
fn bench_artifact_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("artifact_replace");

    for size in SIZES {
        let data = vec![0xABu8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("memory", size), &data, |b, data| {
            let mut artifact = InMemoryArtifact::new();
            b.iter(|| artifact.replace(black_box(data)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("file", size), &data, |b, data| {
            let temp = tempfile::tempdir().unwrap();
            let mut artifact = FileArtifact::open(&temp.path().join("bucket0.txt")).unwrap();
            b.iter(|| artifact.replace(black_box(data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark a push followed by a pull of the same artifact.
fn bench_mirror_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("mirror_round_trip");

    for size in SIZES {
        let data = vec![0xCDu8; size];
        group.throughput(Throughput::Bytes(size as u64 * 2));

        group.bench_with_input(BenchmarkId::new("memory", size), &data, |b, data| {
            let mirror = InMemoryMirror::new();
            b.iter(|| {
                mirror.push("bucket0.txt", black_box(data)).unwrap();
                black_box(mirror.pull("bucket0.txt").unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("directory", size), &data, |b, data| {
            let temp = tempfile::tempdir().unwrap();
            let mirror = DirectoryMirror::open(temp.path()).unwrap();
            b.iter(|| {
                mirror.push("bucket0.txt", black_box(data)).unwrap();
                black_box(mirror.pull("bucket0.txt").unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_artifact_replace, bench_mirror_round_trip);
criterion_main!(benches);
