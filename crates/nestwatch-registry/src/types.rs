//! The closed set of monitorable service types and their per-type
//! configuration blocks. Each config gets its own `validate()`, run by
//! [`crate::definition::ServiceDefinition::validate`] alongside the
//! cross-cutting checks.

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Web,
    Tcp,
    Ping,
    Dns,
    Ssl,
    Keyword,
    Port,
    Heartbeat,
    Github,
    UptimeApi,
    Custom,
    AwsHealth,
    AzureHealth,
    GcpHealth,
    Kubernetes,
    Docker,
}

impl ServiceType {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceType::Web => "web",
            ServiceType::Tcp => "tcp",
            ServiceType::Ping => "ping",
            ServiceType::Dns => "dns",
            ServiceType::Ssl => "ssl",
            ServiceType::Keyword => "keyword",
            ServiceType::Port => "port",
            ServiceType::Heartbeat => "heartbeat",
            ServiceType::Github => "github",
            ServiceType::UptimeApi => "uptime-api",
            ServiceType::Custom => "custom",
            ServiceType::AwsHealth => "aws-health",
            ServiceType::AzureHealth => "azure-health",
            ServiceType::GcpHealth => "gcp-health",
            ServiceType::Kubernetes => "kubernetes",
            ServiceType::Docker => "docker",
        }
    }
}

/// Validates `target` against the shape the probe implementation for
/// `service_type` expects, per `spec.md`'s target-format table.
pub fn validate_target(service_type: &ServiceType, target: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(RegistryError::InvalidTarget {
            service_type: service_type.name().to_string(),
            reason: reason.to_string(),
        })
    };

    match service_type {
        ServiceType::Web | ServiceType::Keyword | ServiceType::UptimeApi | ServiceType::Custom => {
            if target.starts_with("http://") || target.starts_with("https://") {
                Ok(())
            } else {
                invalid("must be an http(s):// URL")
            }
        }
        ServiceType::Tcp | ServiceType::Port => {
            if target.rsplit_once(':').is_some_and(|(_, port)| port.parse::<u16>().is_ok()) {
                Ok(())
            } else {
                invalid("must be host:port")
            }
        }
        ServiceType::Ping => {
            if target.is_empty() {
                invalid("must be a non-empty host")
            } else {
                Ok(())
            }
        }
        ServiceType::Dns => {
            if target.contains('.') {
                Ok(())
            } else {
                invalid("must be a resolvable hostname")
            }
        }
        ServiceType::Ssl => {
            if target.rsplit_once(':').is_some_and(|(_, port)| port.parse::<u16>().is_ok())
                || !target.is_empty()
            {
                Ok(())
            } else {
                invalid("must be host or host:port")
            }
        }
        ServiceType::Heartbeat => {
            if !target.is_empty() {
                Ok(())
            } else {
                invalid("must be a non-empty heartbeat identifier")
            }
        }
        ServiceType::Github => {
            if target.split('/').count() == 2 && !target.is_empty() {
                Ok(())
            } else {
                invalid("must be owner/repo")
            }
        }
        ServiceType::AwsHealth | ServiceType::AzureHealth | ServiceType::GcpHealth => {
            if !target.is_empty() {
                Ok(())
            } else {
                invalid("must name a region or service")
            }
        }
        ServiceType::Kubernetes | ServiceType::Docker => {
            if !target.is_empty() {
                Ok(())
            } else {
                invalid("must name a namespace/deployment or container selector")
            }
        }
    }
}
