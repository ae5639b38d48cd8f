//! `ssl`: TLS handshake against `target` (`host` or `host:port`, default
//! 443), verdict from chain validity and certificate expiry.

use super::tcp::classify_io_error;
use super::{with_deadline, Probe, ProbeOutcome};
use crate::error::ProbeError;
use nestwatch_registry::ServiceDescriptor;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

fn split_host_port(target: &str) -> (String, u16) {
    match target.rsplit_once(':') {
        Some((host, port)) if port.parse::<u16>().is_ok() => (host.to_string(), port.parse().unwrap()),
        _ => (target.to_string(), 443),
    }
}

pub struct SslProbe;

impl Probe for SslProbe {
    fn probe<'a>(
        &'a self,
        descriptor: &'a ServiceDescriptor,
        deadline: Duration,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<ProbeOutcome, ProbeError>> + Send + 'a>> {
        Box::pin(async move {
            let (host, port) = split_host_port(&descriptor.target);
            let warning_days = descriptor
                .type_config
                .get("warning_days")
                .and_then(|v| v.as_i64())
                .unwrap_or(14);

            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let config = ClientConfig::builder().with_root_certificates(roots).with_no_client_auth();
            let connector = TlsConnector::from(Arc::new(config));

            let server_name = ServerName::try_from(host.clone()).map_err(|_| ProbeError::TlsHandshake(format!("invalid hostname {host}")))?;

            let started = Instant::now();
            let tcp = with_deadline(deadline, async {
                TcpStream::connect((host.as_str(), port)).await.map_err(classify_io_error)
            })
            .await?;

            let tls_stream = with_deadline(deadline, async {
                connector
                    .connect(server_name, tcp)
                    .await
                    .map_err(|e| ProbeError::TlsHandshake(e.to_string()))
            })
            .await?;
            let elapsed = started.elapsed();

            let (_, session) = tls_stream.get_ref();
            let cert_der = session
                .peer_certificates()
                .and_then(|certs| certs.first())
                .ok_or_else(|| ProbeError::TlsHandshake("no peer certificate".to_string()))?;

            let (_, cert) = x509_parser::parse_x509_certificate(cert_der.as_ref())
                .map_err(|e| ProbeError::TlsHandshake(format!("certificate parse error: {e}")))?;

            let not_after = cert.validity().not_after.timestamp();
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs() as i64;
            let days_remaining = (not_after - now) / 86_400;

            if days_remaining <= 0 {
                return Ok(ProbeOutcome::down("certificate expired"));
            }
            if days_remaining <= warning_days {
                return Ok(ProbeOutcome::degraded(format!("certificate expires in {days_remaining} days"), elapsed));
            }

            Ok(ProbeOutcome::up(format!("valid, expires in {days_remaining} days"), elapsed))
        })
    }
}
