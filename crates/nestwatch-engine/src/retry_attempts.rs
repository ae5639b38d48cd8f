//! Wraps a single probe invocation in up-to-`retries+1` attempts, retrying
//! only transport-class errors. A semantic `down` verdict is never retried.

use crate::error::ProbeError;
use crate::probe::ProbeRegistry;
use crate::result::{CheckResult, CheckStatus};
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, SystemTime};

const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Runs `descriptor`'s probe up to `descriptor.retries + 1` times. A probe
/// that errors is treated as `unknown` on the first attempt and `down`
/// after the last attempt exhausts a transport-class error.
pub async fn run_with_attempts(registry: &ProbeRegistry, descriptor: &ServiceDescriptor) -> CheckResult {
    let max_attempts = descriptor.retries + 1;

    for attempt in 1..=max_attempts {
        match registry.run(descriptor, attempt).await {
            Ok(result) => return result,
            Err(error) => {
                let is_last = attempt == max_attempts;
                if !error.is_transport_class() || is_last {
                    return transport_failure_result(descriptor, attempt, &error, is_last);
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }

    unreachable!("max_attempts is always >= 1")
}

fn transport_failure_result(descriptor: &ServiceDescriptor, attempt: u32, error: &ProbeError, is_last: bool) -> CheckResult {
    CheckResult {
        service_id: descriptor.service_id.clone(),
        nest_id: descriptor.nest_id.clone(),
        status: if is_last { CheckStatus::Down } else { CheckStatus::Unknown },
        message: error.to_string(),
        response_time: None,
        timestamp: SystemTime::now(),
        check_duration: Duration::ZERO,
        attempt,
        metadata: serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeRegistry;
    use nestwatch_registry::templates::basic_web;
    use nestwatch_registry::ServiceDescriptor;

    #[tokio::test]
    async fn unreachable_host_becomes_down_after_exhausting_retries() {
        let registry = ProbeRegistry::noop();
        let mut def = basic_web("svc-1", "acme", "dead", "http://127.0.0.1:1");
        def.retries = 1;
        let descriptor = ServiceDescriptor::from(&def);

        let result = run_with_attempts(&registry, &descriptor).await;
        assert_eq!(result.status, CheckStatus::Down);
        assert_eq!(result.attempt, 2);
    }
}
