//! The resource being pooled is produced and validated by an injected factory.

use std::future::Future;

pub trait ConnectionFactory<T>: Send + Sync {
    fn create(&self) -> impl Future<Output = Result<T, String>> + Send;

    /// Re-validates an idle connection before handing it out or during the
    /// background sweep. Defaults to always-valid for factories with nothing
    /// cheap to check.
    fn validate(&self, _conn: &T) -> impl Future<Output = bool> + Send {
        async { true }
    }
}
