//! Core infrastructure shared by every nestwatch crate.
//!
//! - [`events`] — the typed, panic-isolated event bus every component
//!   publishes on.
//! - [`error`] — [`ResilienceError`], a common error wrapper for layers
//!   composed around outbound I/O.
//! - [`health`] — the `Health` trait every component implements so the
//!   process entrypoint can aggregate `healthy = AND(components)`.
//! - [`rolling_window`] — a small time-bounded sample buffer reused by the
//!   circuit breaker, the connectivity guard, and the failover controller.

pub mod error;
pub mod events;
pub mod executor;
pub mod health;
pub mod rolling_window;

pub use error::ResilienceError;
pub use events::{EventListener, EventListeners, FnListener, ResilienceEvent};
pub use executor::Executor;
pub use health::{ComponentHealth, Health};
pub use rolling_window::RollingWindow;
