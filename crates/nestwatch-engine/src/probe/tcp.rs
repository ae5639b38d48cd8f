//! `tcp` / `port`: raw TCP connect, optional banner/expected-response match.

use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

pub struct TcpProbe;

impl Probe for TcpProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let expected_banner = descriptor.type_config.get("expected_banner").and_then(|v| v.as_str());
            let started = Instant::now();

            let mut stream = with_deadline(deadline, async {
                TcpStream::connect(&descriptor.target).await.map_err(classify_io_error)
            })
            .await?;

            if let Some(expected) = expected_banner {
                let mut buf = [0u8; 256];
                let n = with_deadline(deadline, async { stream.read(&mut buf).await.map_err(classify_io_error) }).await?;
                let banner = String::from_utf8_lossy(&buf[..n]);
                if !banner.contains(expected) {
                    return Ok(ProbeOutcome::down(format!("banner mismatch: {banner:?}")));
                }
            }

            Ok(ProbeOutcome::up("connected", started.elapsed()))
        })
    }
}

pub(crate) fn classify_io_error(err: std::io::Error) -> ProbeError {
    use std::io::ErrorKind;
    match err.kind() {
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset => ProbeError::ConnectionRefused,
        ErrorKind::TimedOut => ProbeError::Timeout,
        _ => ProbeError::Transport(err.to_string()),
    }
}
