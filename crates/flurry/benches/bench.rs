use core::hint::black_box;
use criterion::async_executor::SmolExecutor;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use flurry::{
    FlakeGenerator, FlakeGeneratorAsyncExt, GeneratorOptions, LockFlakeGenerator, OverflowMode,
    Poll, SmolSleep, SystemClock, TimeSource, TokioSleep,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

#[derive(Clone, Copy)]
struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). Exactly one millisecond's worth of sequence, so a fresh
// generator on a fixed clock never has to wait.
const TOTAL_IDS: usize = 4096;

fn fixed_options(overflow: OverflowMode) -> GeneratorOptions<FixedMockTime> {
    GeneratorOptions::new(FixedMockTime { millis: 1 }).with_overflow(overflow)
}

/// Benchmarks the hot path where every attempt is `Ready`.
fn bench_generator<T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> FlakeGenerator<T>,
) where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_next_id() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the blocking path, which spins whenever a millisecond is
/// exhausted (realistic wallclock behavior).
fn bench_generator_spin<T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> FlakeGenerator<T>,
) where
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut generator = generator_factory();
                for id in generator.iter().take(TOTAL_IDS) {
                    black_box(id);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one shared generator across threads, yielding on `Pending`.
fn bench_generator_contended<T>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> LockFlakeGenerator<T>,
) where
    T: TimeSource + Send,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = generator_fn();
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = generator.clone();
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        let id = generator.try_next_id().unwrap();
                                        black_box(id);
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks a single async generator on one Tokio worker.
fn bench_generator_sequential_async_tokio(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();

        b.to_async(&rt).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let mut generator = FlakeGenerator::new(0, 0, GeneratorOptions::default());
                for _ in 0..TOTAL_IDS {
                    let id = generator.next_id_async::<TokioSleep>().await;
                    black_box(id);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks a single async generator on the Smol executor.
fn bench_generator_sequential_async_smol(c: &mut Criterion, group_name: &str) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.to_async(SmolExecutor).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let mut generator = FlakeGenerator::new(0, 0, GeneratorOptions::default());
                for _ in 0..TOTAL_IDS {
                    let id = generator.next_id_async::<SmolSleep>().await;
                    black_box(id);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

// --- MOCK CLOCK ---

/// Per-tick overflow with a fixed clock.
fn benchmark_mock_sequential_per_tick(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/per-tick", || {
        FlakeGenerator::new(0, 0, fixed_options(OverflowMode::PerTick))
    });
}

/// Bulk overflow with a fixed clock. Only the first call reads the clock.
fn benchmark_mock_sequential_bulk(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/bulk", || {
        FlakeGenerator::new(0, 0, fixed_options(OverflowMode::Bulk))
    });
}

/// `LockFlakeGenerator` shared across threads with a fixed clock.
fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "mock/contended/lock", || {
        LockFlakeGenerator::new(0, 0, fixed_options(OverflowMode::PerTick))
    });
}

// --- SYSTEM CLOCK (realistic time with potential spinning) ---

fn benchmark_system_sequential_per_tick(c: &mut Criterion) {
    bench_generator_spin(c, "system/sequential/per-tick", || {
        FlakeGenerator::new(0, 0, GeneratorOptions::default())
    });
}

fn benchmark_system_sequential_bulk(c: &mut Criterion) {
    bench_generator_spin(c, "system/sequential/bulk", || {
        FlakeGenerator::new(
            0,
            0,
            GeneratorOptions::default().with_overflow(OverflowMode::Bulk),
        )
    });
}

fn benchmark_system_contended_lock(c: &mut Criterion) {
    bench_generator_contended(c, "system/contended/lock", || {
        LockFlakeGenerator::new(0, 0, GeneratorOptions::<SystemClock>::default())
    });
}

fn benchmark_system_sequential_tokio(c: &mut Criterion) {
    bench_generator_sequential_async_tokio(c, "system/sequential/async/tokio");
}

fn benchmark_system_sequential_smol(c: &mut Criterion) {
    bench_generator_sequential_async_smol(c, "system/sequential/async/smol");
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_per_tick,
    benchmark_mock_sequential_bulk,
    benchmark_mock_contended_lock,
    // System clock (spinning)
    benchmark_system_sequential_per_tick,
    benchmark_system_sequential_bulk,
    benchmark_system_contended_lock,
    // Async single worker, single generator
    benchmark_system_sequential_tokio,
    benchmark_system_sequential_smol,
);
criterion_main!(benches);
