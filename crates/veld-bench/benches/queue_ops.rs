//! Criterion micro-benchmarks for the two-lane command queue.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use veld_bench::NopCommand;
use veld_engine::queue::CommandQueue;

fn bench_enqueue(c: &mut Criterion) {
    c.bench_function("queue/receive_100", |b| {
        b.iter_batched(
            CommandQueue::new,
            |queue| {
                for _ in 0..100 {
                    queue.receive(Box::new(NopCommand));
                }
                black_box(queue.len())
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_enqueue_drain_cycle(c: &mut Criterion) {
    c.bench_function("queue/receive_take_cycle", |b| {
        let queue = CommandQueue::new();
        b.iter(|| {
            for _ in 0..32 {
                queue.receive(Box::new(NopCommand));
                queue.receive_immediate(Box::new(NopCommand));
            }
            let immediate = queue.take_immediate();
            let normal = queue.take_normal();
            black_box((immediate.len(), normal.len()))
        });
    });
}

criterion_group!(benches, bench_enqueue, bench_enqueue_drain_cycle);
criterion_main!(benches);
