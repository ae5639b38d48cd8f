//! The external routing layer is outside this crate's reach; failover
//! strategies drive it through this injected adapter rather than talking to
//! a load balancer or service mesh directly.

use std::future::Future;
use std::pin::Pin;

pub trait TrafficRoutingAdapter: Send + Sync {
    /// Directs `percentage` of `source`'s traffic to `target`. Called once
    /// per strategy step; a `BLUE_GREEN` switch calls it once with 100.
    fn redirect<'a>(&'a self, source: &'a str, target: &'a str, percentage: u8) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// No real routing layer wired up; records nothing, redirects nothing.
/// Suitable for tests and for running the controller without a mesh.
pub struct NoOpTrafficRoutingAdapter;

impl TrafficRoutingAdapter for NoOpTrafficRoutingAdapter {
    fn redirect<'a>(&'a self, _source: &'a str, _target: &'a str, _percentage: u8) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }
}
