//! Per-service coalescing/concurrency overhead of the probe dispatcher, in
//! isolation from any real network round trip.

use criterion::{criterion_group, criterion_main, Criterion};
use nestwatch_engine::{Dispatcher, ProbeRegistry};
use nestwatch_registry::templates::basic_web;
use nestwatch_registry::ServiceDescriptor;
use std::hint::black_box;
use std::sync::Arc;

fn unreachable_descriptor(id: &str) -> ServiceDescriptor {
    let def = basic_web(id, "bench-nest", id, "http://127.0.0.1:1");
    ServiceDescriptor::from(&def)
}

fn bench_single_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(ProbeRegistry::noop()), 50));

    c.bench_function("dispatch_single_service", |b| {
        b.to_async(&runtime).iter(|| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                let result = dispatcher.dispatch(black_box(unreachable_descriptor("svc-1"))).await;
                black_box(result)
            }
        });
    });
}

fn bench_concurrent_distinct_services(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(ProbeRegistry::noop()), 50));

    c.bench_function("dispatch_twenty_distinct_services", |b| {
        b.to_async(&runtime).iter(|| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                let handles: Vec<_> = (0..20)
                    .map(|i| {
                        let dispatcher = Arc::clone(&dispatcher);
                        let descriptor = unreachable_descriptor(&format!("svc-{i}"));
                        tokio::spawn(async move { dispatcher.dispatch(descriptor).await })
                    })
                    .collect();
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
            }
        });
    });
}

fn bench_coalesced_same_service(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(ProbeRegistry::noop()), 50));

    c.bench_function("dispatch_twenty_coalesced_calls", |b| {
        b.to_async(&runtime).iter(|| {
            let dispatcher = Arc::clone(&dispatcher);
            async move {
                let descriptor = unreachable_descriptor("svc-shared");
                let handles: Vec<_> = (0..20)
                    .map(|_| {
                        let dispatcher = Arc::clone(&dispatcher);
                        let descriptor = descriptor.clone();
                        tokio::spawn(async move { dispatcher.dispatch(descriptor).await })
                    })
                    .collect();
                for handle in handles {
                    black_box(handle.await.unwrap());
                }
            }
        });
    });
}

criterion_group!(
    benches,
    bench_single_dispatch,
    bench_concurrent_distinct_services,
    bench_coalesced_same_service
);
criterion_main!(benches);
