//! Sequencer benchmarks
//!
//! Tests reserve/commit throughput through a full leader/follower pipeline:
//! - Single writer vs multi-writer (CAS) reservation
//! - Batch reservations
//! - Wait strategy comparison
//!
//! Run: cargo bench --bench bench_sequencer

use criterion::{ criterion_group, criterion_main, BenchmarkId, Criterion, Throughput };
use std::hint::black_box;
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;
use std::thread;

use ringo::{ Backoff, BusySpin, Pipeline, WaitStrategy, Writers, Yielding };
use ringo::{ MultiWriter, SingleWriter };

const RING_SIZE: usize = 64 * 1024;
const TOTAL_EVENTS: u64 = 1_000_000;

// ============================================================================
// Core benchmark function - used by all tests
// ============================================================================

fn bench_pipeline<L, F, S>(events: u64, batch: usize, wait: S) -> u64
    where L: Writers, F: Writers, S: WaitStrategy
{
    let pipeline = Pipeline::<L, F, S>::with_wait_strategy(RING_SIZE, wait).unwrap();
    let (leader, follower) = pipeline.into_parts();
    let payload: Arc<Vec<AtomicU64>> = Arc::new((0..RING_SIZE).map(|_| AtomicU64::new(0)).collect());
    let rounds = events / (batch as u64);

    let payload_cons = payload.clone();
    let consumer = thread::spawn(move || {
        for _ in 0..rounds {
            let upper = follower.reserve(batch);
            let lower = upper - (batch as i64) + 1;
            for j in lower..=upper {
                black_box(payload_cons[follower.slot(j)].load(Ordering::Relaxed));
            }
            follower.commit(lower, upper);
        }
    });

    for _ in 0..rounds {
        let upper = leader.reserve(batch);
        let lower = upper - (batch as i64) + 1;
        for j in lower..=upper {
            payload[leader.slot(j)].store(j as u64, Ordering::Relaxed);
        }
        leader.commit(lower, upper);
    }

    consumer.join().unwrap();
    rounds * (batch as u64)
}

fn benchmark_writers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Writer Arity (1M events)");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(20);

    group.bench_function(BenchmarkId::new("writers", "single"), |b| {
        b.iter(|| bench_pipeline::<SingleWriter, SingleWriter, _>(TOTAL_EVENTS, 1, Backoff::default()))
    });

    group.bench_function(BenchmarkId::new("writers", "multi"), |b| {
        b.iter(|| bench_pipeline::<MultiWriter, MultiWriter, _>(TOTAL_EVENTS, 1, Backoff::default()))
    });

    group.finish();
}

fn benchmark_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Batch Reservations");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(20);

    for batch in [1usize, 16, 256] {
        group.bench_with_input(BenchmarkId::new("batch", batch), &batch, |b, &batch| {
            b.iter(|| bench_pipeline::<SingleWriter, SingleWriter, _>(TOTAL_EVENTS, batch, Backoff::default()))
        });
    }

    group.finish();
}

fn benchmark_wait_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Wait Strategies");
    group.throughput(Throughput::Elements(TOTAL_EVENTS));
    group.sample_size(10);

    group.bench_function("busy_spin", |b| {
        b.iter(|| bench_pipeline::<SingleWriter, SingleWriter, _>(TOTAL_EVENTS, 1, BusySpin))
    });

    group.bench_function("yielding", |b| {
        b.iter(|| bench_pipeline::<SingleWriter, SingleWriter, _>(TOTAL_EVENTS, 1, Yielding))
    });

    group.bench_function("backoff", |b| {
        b.iter(|| bench_pipeline::<SingleWriter, SingleWriter, _>(TOTAL_EVENTS, 1, Backoff::default()))
    });

    group.finish();
}

criterion_group!(benches, benchmark_writers, benchmark_batches, benchmark_wait_strategies);
criterion_main!(benches);
