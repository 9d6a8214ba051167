//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::schema::RegistryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line or through environment variables.
///
/// Each field that is set wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub config_dir: Option<PathBuf>,
    pub heartbeat_timeout: Option<Duration>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut RegistryConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(dir) = self.config_dir {
            config.routing.config_dir = dir;
        }
        if let Some(timeout) = self.heartbeat_timeout {
            config.liveness.heartbeat_timeout = timeout;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

/// Parse configuration from a TOML string without validating it.
pub fn parse_config(content: &str) -> Result<RegistryConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn read_config_file(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Build the effective configuration: defaults, then the optional file, then overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: ConfigOverrides,
) -> Result<RegistryConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RegistryConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
