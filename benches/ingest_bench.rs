//! Benchmarks for batched store ingestion

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

use datasetkv::batcher::Batcher;
use datasetkv::store::{BackendKind, Mode, Store};

/// Commit 1000 label-sized records through a batcher, per engine
fn ingest_benchmarks(c: &mut Criterion) {
    let value = vec![0xABu8; 32];

    let mut group = c.benchmark_group("commit_1000_rows");
    for kind in [BackendKind::Log, BackendKind::Table] {
        group.bench_function(kind.as_str(), |b| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |temp| {
                    let store =
                        Store::open(kind, &temp.path().join("db"), Mode::CreateNew).unwrap();
                    let mut batcher = Batcher::new("bench", store, 1000);
                    for i in 0..1000 {
                        let key = format!("{:08}_img{}.jpg", i, i);
                        batcher.put(&key, &value).unwrap();
                    }
                    batcher.finish().unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, ingest_benchmarks);
criterion_main!(benches);
