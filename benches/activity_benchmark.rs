/*!
 * Activity Store Benchmarks
 *
 * Ingest throughput on the capture path and report tick cost over many hosts
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::time::Instant;
use traffic_sonifier::{
    ActivityStore, FrameIngestor, HostId, InstrumentCatalog, LevelEngine, SonifierStats,
};

fn hosts(n: usize) -> Vec<HostId> {
    (0..n)
        .map(|i| {
            let b = (i as u32).to_be_bytes();
            HostId::from_mac(&[0x02, 0x00, b[0], b[1], b[2], b[3]])
        })
        .collect()
}

fn bench_ingest_existing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_existing");

    for count in [1usize, 64, 1024] {
        let store = ActivityStore::new();
        let ids = hosts(count);
        for id in &ids {
            store.ingest(id, 64);
        }

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(count), &ids, |b, ids| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % ids.len();
                black_box(store.ingest(&ids[i], 64));
            });
        });
    }

    group.finish();
}

fn bench_ingest_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_contended");
    const FRAMES: usize = 10_000;

    for threads in [1usize, 2, 4] {
        group.throughput(Throughput::Elements((threads * FRAMES) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                let ids = Arc::new(hosts(256));
                b.iter(|| {
                    let store = Arc::new(ActivityStore::new());
                    let handles: Vec<_> = (0..threads)
                        .map(|t| {
                            let store = store.clone();
                            let ids = ids.clone();
                            thread::spawn(move || {
                                for i in 0..FRAMES {
                                    store.ingest(&ids[(i + t) % ids.len()], 128);
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_ingest_frame(c: &mut Criterion) {
    let store = Arc::new(ActivityStore::new());
    let ingestor = FrameIngestor::new(store, Arc::new(SonifierStats::new()));
    let mut frame = vec![0u8; 590];
    frame[..6].copy_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
    frame[6..12].copy_from_slice(&[0x02, 0, 0, 0, 0, 0x02]);

    c.bench_function("ingest_frame", |b| {
        b.iter(|| black_box(ingestor.ingest_frame(black_box(&frame))));
    });
}

fn bench_report_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_tick");

    for count in [16usize, 256, 4096] {
        let engine = LevelEngine::new(
            Arc::new(ActivityStore::new()),
            Arc::new(InstrumentCatalog::default()),
            Arc::new(SonifierStats::new()),
        );
        let start = Instant::now();
        for id in hosts(count) {
            engine.store().ingest_at(&id, 10_000, start);
        }
        let now = start + Duration::from_secs(1);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &now, |b, &now| {
            b.iter(|| black_box(engine.tick_at(now)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest_existing,
    bench_ingest_contended,
    bench_ingest_frame,
    bench_report_tick
);
criterion_main!(benches);
