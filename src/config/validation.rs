//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Keep sweep and client heartbeat intervals below the heartbeat timeout
//! - Check the generated file location and hostname template
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegistryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::schema::RegistryConfig;
use crate::registry::name;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("liveness.heartbeat_timeout must be greater than zero")]
    ZeroHeartbeatTimeout,
    #[error("liveness.sweep_interval ({interval:?}) must be less than heartbeat_timeout ({timeout:?})")]
    SweepTooSlow { interval: Duration, timeout: Duration },
    #[error("liveness.sweep_interval must be greater than zero")]
    ZeroSweepInterval,
    #[error("liveness.client_heartbeat_interval ({interval:?}) must be less than heartbeat_timeout ({timeout:?})")]
    HeartbeatTooSlow { interval: Duration, timeout: Duration },
    #[error("routing.file_name {0:?} must be a plain, non-empty file name")]
    InvalidFileName(String),
    #[error("routing.domain_suffix {0:?} is not a valid domain")]
    InvalidDomainSuffix(String),
    #[error("routing.upstream_host must not be empty")]
    EmptyUpstreamHost,
    #[error("routing.entry_points must list at least one entry point")]
    NoEntryPoints,
    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let liveness = &config.liveness;

    if liveness.heartbeat_timeout.is_zero() {
        errors.push(ValidationError::ZeroHeartbeatTimeout);
    }
    if liveness.sweep_interval.is_zero() {
        errors.push(ValidationError::ZeroSweepInterval);
    } else if liveness.sweep_interval >= liveness.heartbeat_timeout {
        errors.push(ValidationError::SweepTooSlow {
            interval: liveness.sweep_interval,
            timeout: liveness.heartbeat_timeout,
        });
    }
    if liveness.client_heartbeat_interval >= liveness.heartbeat_timeout {
        errors.push(ValidationError::HeartbeatTooSlow {
            interval: liveness.client_heartbeat_interval,
            timeout: liveness.heartbeat_timeout,
        });
    }

    let routing = &config.routing;
    let file_name = &routing.file_name;
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
    {
        errors.push(ValidationError::InvalidFileName(file_name.clone()));
    }
    if !name::validate(&routing.domain_suffix) {
        errors.push(ValidationError::InvalidDomainSuffix(routing.domain_suffix.clone()));
    }
    if routing.upstream_host.trim().is_empty() {
        errors.push(ValidationError::EmptyUpstreamHost);
    }
    if routing.entry_points.is_empty() {
        errors.push(ValidationError::NoEntryPoints);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(observability.metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
