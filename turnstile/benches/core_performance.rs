use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::{Duration, SystemTime};
use turnstile::{MemoryStore, RateLimiter, RateLimiterBuilder};

fn benchmark_check_rate_limit(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_rate_limit");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("single_key_allowed", |b| {
        let mut limiter = RateLimiterBuilder::new()
            .max_requests(u32::MAX)
            .build(MemoryStore::new())
            .unwrap();

        b.iter(|| {
            let decision = limiter
                .check_rate_limit(black_box("bench_key"), black_box(SystemTime::now()))
                .unwrap();
            black_box(decision.allowed)
        });
    });

    // Multiple keys to simulate real-world usage
    group.bench_function("rotating_keys_100", |b| {
        let mut limiter = RateLimiterBuilder::new()
            .max_requests(u32::MAX)
            .build(MemoryStore::with_capacity(1_000))
            .unwrap();
        let mut counter = 0u64;

        b.iter(|| {
            let key = format!("key_{}", counter % 100);
            counter += 1;

            let decision = limiter
                .check_rate_limit(black_box(&key), black_box(SystemTime::now()))
                .unwrap();
            black_box(decision.allowed)
        });
    });

    // Denied checks skip the write entirely (worst case for callers,
    // best case for the store)
    group.bench_function("single_key_denied", |b| {
        let mut limiter = RateLimiter::new(MemoryStore::new());
        for _ in 0..25 {
            limiter
                .check_rate_limit("exhausted_key", SystemTime::now())
                .unwrap();
        }

        b.iter(|| {
            let decision = limiter
                .check_rate_limit(black_box("exhausted_key"), black_box(SystemTime::now()))
                .unwrap();
            black_box(decision.allowed)
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_check_rate_limit);
criterion_main!(benches);
