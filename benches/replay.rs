use criterion::*;
use heapbench::config::GenConfig;
use heapbench::generate::random_trace;
use heapbench::run::{parse_trace, replay, Op};
use heapbench::{FibonacciHeap, LazyBinaryHeap, PairingHeap};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

fn trace_instance(cfg: &GenConfig, seed: u64) -> (usize, Vec<Op>) {
    let mut buf = Vec::new();
    random_trace(&mut buf, cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
    parse_trace(&buf[..]).unwrap()
}

fn add_heavy_instance() -> (usize, Vec<Op>) {
    let cfg = GenConfig {
        size: 1000,
        op: 100_000,
        addfreq: 8,
        decfreq: 1,
        popfreq: 1,
        ..GenConfig::default()
    };
    trace_instance(&cfg, 11)
}

fn decrease_heavy_instance() -> (usize, Vec<Op>) {
    let cfg = GenConfig {
        size: 1000,
        op: 100_000,
        ..GenConfig::default()
    };
    trace_instance(&cfg, 12)
}

fn pop_heavy_instance() -> (usize, Vec<Op>) {
    let cfg = GenConfig {
        size: 1000,
        op: 100_000,
        addfreq: 2,
        decfreq: 1,
        popfreq: 3,
        ..GenConfig::default()
    };
    trace_instance(&cfg, 13)
}

fn bench_pairing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairing");
    group.measurement_time(Duration::from_secs(10));
    for (name, instance) in [
        ("add_heavy", add_heavy_instance()),
        ("decrease_heavy", decrease_heavy_instance()),
        ("pop_heavy", pop_heavy_instance()),
    ] {
        let (adds, ops) = instance;
        group.bench_function(name, |b| {
            b.iter_batched(
                PairingHeap::new,
                |heap| replay(heap, adds, &ops),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_fibonacci(c: &mut Criterion) {
    let mut group = c.benchmark_group("fibonacci");
    group.measurement_time(Duration::from_secs(10));
    for (name, instance) in [
        ("add_heavy", add_heavy_instance()),
        ("decrease_heavy", decrease_heavy_instance()),
        ("pop_heavy", pop_heavy_instance()),
    ] {
        let (adds, ops) = instance;
        group.bench_function(name, |b| {
            b.iter_batched(
                FibonacciHeap::new,
                |heap| replay(heap, adds, &ops),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_binary(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary");
    group.measurement_time(Duration::from_secs(10));
    for (name, instance) in [
        ("add_heavy", add_heavy_instance()),
        ("decrease_heavy", decrease_heavy_instance()),
        ("pop_heavy", pop_heavy_instance()),
    ] {
        let (adds, ops) = instance;
        group.bench_function(name, |b| {
            b.iter_batched(
                LazyBinaryHeap::new,
                |heap| replay(heap, adds, &ops),
                BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(benches, bench_pairing, bench_fibonacci, bench_binary);
criterion_main!(benches);
