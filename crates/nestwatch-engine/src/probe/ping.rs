//! `ping`: ICMP echo, falling back to a TCP connect against configured
//! fallback ports when raw ICMP isn't permitted (unprivileged containers).

use super::tcp::classify_io_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::net::ToSocketAddrs;
use std::time::{Duration, Instant};
use surge_ping::{Client, Config, PingIdentifier, PingSequence};
use tokio::net::TcpStream;

pub struct PingProbe;

impl Probe for PingProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            match icmp_echo(&descriptor.target, deadline).await {
                Ok(rtt) => return Ok(ProbeOutcome::up(format!("icmp rtt {rtt:?}"), rtt)),
                Err(icmp_err) => {
                    let fallback_ports: Vec<u16> = descriptor
                        .type_config
                        .get("fallback_ports")
                        .and_then(|v| v.as_array())
                        .map(|arr| arr.iter().filter_map(|v| v.as_u64()).map(|v| v as u16).collect())
                        .unwrap_or_default();

                    for port in fallback_ports {
                        let addr = format!("{}:{port}", descriptor.target);
                        let started = Instant::now();
                        if with_deadline(deadline, async { TcpStream::connect(&addr).await.map_err(classify_io_error) })
                            .await
                            .is_ok()
                        {
                            return Ok(ProbeOutcome::up(format!("tcp fallback on port {port}"), started.elapsed()));
                        }
                    }

                    Err(icmp_err)
                }
            }
        })
    }
}

async fn icmp_echo(host: &str, deadline: Duration) -> Result<Duration, ProbeError> {
    let addr = format!("{host}:0")
        .to_socket_addrs()
        .map_err(|e| ProbeError::Resolution(e.to_string()))?
        .next()
        .ok_or_else(|| ProbeError::Resolution("no address found".to_string()))?
        .ip();

    let config = Config::default();
    let client = Client::new(&config).map_err(|e| ProbeError::Transport(e.to_string()))?;
    let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;
    pinger.timeout(deadline);

    let started = Instant::now();
    with_deadline(deadline, async {
        pinger
            .ping(PingSequence(0), &[0; 8])
            .await
            .map(|_| ())
            .map_err(|_| ProbeError::Timeout)
    })
    .await?;

    Ok(started.elapsed())
}
