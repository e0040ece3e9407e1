//! Criterion micro-benchmarks for action-point conversion.

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use veld_core::{ApConverter, IntervalTimer};

fn bench_advance(c: &mut Criterion) {
    c.bench_function("clock/ap_advance", |b| {
        let mut converter = ApConverter::new(100);
        let slice = Duration::from_millis(37);
        b.iter(|| black_box(converter.advance(slice)));
    });
}

fn bench_interval_timer(c: &mut Criterion) {
    c.bench_function("clock/interval_exceeded", |b| {
        let now = Instant::now();
        let mut timer = IntervalTimer::new(Duration::from_secs(60), now);
        b.iter(|| black_box(timer.exceeded(now)));
    });
}

criterion_group!(benches, bench_advance, bench_interval_timer);
criterion_main!(benches);
