//! Selection strategies for choosing healthy resources.

use crate::{HealthCheckedContext, HealthStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Type alias for custom selector function
pub type CustomSelectorFn = Arc<dyn Fn(&[HealthStatus]) -> Option<usize> + Send + Sync>;

/// Trait for implementing custom selection strategies.
///
/// # Examples
///
/// ```rust
/// use nestwatch_healthcheck::{Selector, HealthCheckedContext};
///
/// struct FirstHealthySelector;
///
/// impl<T> Selector<T> for FirstHealthySelector {
///     fn select<'a>(&self, contexts: &'a [HealthCheckedContext<T>]) -> Option<usize> {
///         contexts.iter()
///             .position(|ctx| ctx.status().is_healthy())
///     }
/// }
/// ```
pub trait Selector<T>: Send + Sync {
    /// Select a context from the available options.
    ///
    /// Returns the index of the selected context, or `None` if no suitable context is available.
    fn select(&self, contexts: &[HealthCheckedContext<T>]) -> Option<usize>;
}

// Blanket impl for closures
impl<T, F> Selector<T> for F
where
    F: Fn(&[HealthCheckedContext<T>]) -> Option<usize> + Send + Sync,
{
    fn select(&self, contexts: &[HealthCheckedContext<T>]) -> Option<usize> {
        self(contexts)
    }
}

/// Built-in selection strategies.
#[derive(Clone, Default)]
pub enum SelectionStrategy {
    /// Return first available healthy resource.
    /// Best for: Primary/secondary failover scenarios.
    #[default]
    FirstAvailable,

    /// Return a random healthy resource.
    /// Best for: Load distribution across multiple instances.
    #[cfg(feature = "random")]
    Random,

    /// Round-robin through healthy resources.
    /// Best for: Even distribution of load.
    RoundRobin,

    /// Prefer healthy resources, fallback to degraded if no healthy ones available.
    /// Best for: Accepting degraded performance over failure.
    PreferHealthy,

    /// Use a custom selector implementation.
    /// Best for: Complex selection logic (latency-based, weighted, etc.).
    Custom(CustomSelectorFn),
}

impl SelectionStrategy {
    /// Select a context index based on the strategy.
    ///
    /// This is an internal helper that takes a slice of statuses instead of full contexts
    /// to avoid cloning during selection.
    pub(crate) fn select<T>(
        &self,
        contexts: &[HealthCheckedContext<T>],
        round_robin_counter: &AtomicUsize,
    ) -> Option<usize> {
        if contexts.is_empty() {
            return None;
        }

        // Collect statuses for efficient filtering
        let statuses: Vec<HealthStatus> = contexts.iter().map(|ctx| ctx.status()).collect();

        match self {
            SelectionStrategy::FirstAvailable => statuses.iter().position(|s| s.is_usable()),

            #[cfg(feature = "random")]
            SelectionStrategy::Random => {
                let usable: Vec<usize> = statuses
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_usable())
                    .map(|(i, _)| i)
                    .collect();

                if usable.is_empty() {
                    None
                } else {
                    use rand::Rng;
                    let idx = rand::rng().random_range(0..usable.len());
                    Some(usable[idx])
                }
            }

            SelectionStrategy::RoundRobin => {
                let usable: Vec<usize> = statuses
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.is_usable())
                    .map(|(i, _)| i)
                    .collect();

                if usable.is_empty() {
                    None
                } else {
                    let idx = round_robin_counter.fetch_add(1, Ordering::Relaxed);
                    Some(usable[idx % usable.len()])
                }
            }

            SelectionStrategy::PreferHealthy => {
                // Try to find healthy first
                statuses
                    .iter()
                    .position(|s| *s == HealthStatus::Healthy)
                    .or_else(|| statuses.iter().position(|s| s.is_usable()))
            }

            SelectionStrategy::Custom(selector) => selector(&statuses),
        }
    }
}
