//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! registration service. All types derive Serde traits for deserialization
//! from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the registration service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// HTTP listener for the registration API.
    pub listener: ListenerConfig,

    /// Heartbeat and expiry timing.
    pub liveness: LivenessConfig,

    /// Generated proxy configuration.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub bind_address: String,

    /// Listen port.
    pub port: u16,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl ListenerConfig {
    /// Address string passed to the TCP listener.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 10,
            max_body_size: 64 * 1024,
        }
    }
}

/// Liveness configuration.
///
/// Both the sweep interval and the client heartbeat interval must stay below
/// the heartbeat timeout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Time without heartbeat after which a client is evicted.
    #[serde(with = "humantime_serde")]
    pub heartbeat_timeout: Duration,

    /// How often the sweeper looks for lapsed clients.
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,

    /// Interval at which well-behaved clients send heartbeats.
    #[serde(with = "humantime_serde")]
    pub client_heartbeat_interval: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5),
            client_heartbeat_interval: Duration::from_secs(10),
        }
    }
}

/// Generated proxy configuration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Directory shared with the proxy.
    pub config_dir: PathBuf,

    /// File name of the generated document inside `config_dir`.
    pub file_name: String,

    /// Domain appended to client identifiers.
    pub domain_suffix: String,

    /// Host the proxy uses to reach registered ports.
    pub upstream_host: String,

    /// Proxy entry points for generated routers.
    pub entry_points: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("/config"),
            file_name: "dynamic.yml".to_string(),
            domain_suffix: "localhost".to_string(),
            upstream_host: "host.docker.internal".to_string(),
            entry_points: vec!["web".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
