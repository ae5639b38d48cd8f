//! A bounded work-pool of at most `concurrentChecks` in-flight probes, with
//! per-service coalescing: at most one in-flight and one pending dispatch
//! per service, so a slow service can't pile up duplicate work when its
//! trigger fires faster than its probe completes.

use crate::probe::ProbeRegistry;
use crate::result::CheckResult;
use crate::retry_attempts::run_with_attempts;
use nestwatch_coalesce::CoalesceLayer;
use nestwatch_registry::ServiceDescriptor;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower::{Service, ServiceBuilder, ServiceExt};

type DispatchService = tower::util::BoxCloneService<ServiceDescriptor, CheckResult, Infallible>;

pub struct Dispatcher {
    service: tokio::sync::Mutex<DispatchService>,
    concurrency: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ProbeRegistry>, concurrent_checks: usize) -> Self {
        let base = tower::service_fn(move |descriptor: ServiceDescriptor| {
            let registry = Arc::clone(&registry);
            async move { Ok::<_, Infallible>(run_with_attempts(&registry, &descriptor).await) }
        });

        let service = ServiceBuilder::new()
            .layer(CoalesceLayer::builder(|d: &ServiceDescriptor| d.service_id.clone()).name("engine-dispatch").build())
            .service(base);

        Self {
            service: tokio::sync::Mutex::new(tower::util::BoxCloneService::new(service)),
            concurrency: Arc::new(Semaphore::new(concurrent_checks)),
        }
    }

    /// Runs one probe dispatch for `descriptor`, waiting for a free
    /// concurrency slot first. Concurrent calls for the same `service_id`
    /// are coalesced into a single execution.
    pub async fn dispatch(&self, descriptor: ServiceDescriptor) -> CheckResult {
        let _permit = self.concurrency.acquire().await.expect("semaphore is never closed");
        let mut service = self.service.lock().await.clone();
        service
            .ready()
            .await
            .expect("BoxCloneService<_, _, Infallible> is always ready")
            .call(descriptor)
            .await
            .expect("dispatch service never returns Err")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestwatch_registry::templates::basic_web;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn concurrent_dispatches_for_the_same_service_are_coalesced() {
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(ProbeRegistry::noop()), 10));
        let def = basic_web("svc-1", "acme", "one", "http://127.0.0.1:1");
        let descriptor = ServiceDescriptor::from(&def);

        let calls = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..5 {
            let dispatcher = Arc::clone(&dispatcher);
            let descriptor = descriptor.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                dispatcher.dispatch(descriptor).await;
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
