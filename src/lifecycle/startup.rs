//! Startup orchestration.
//!
//! # Responsibilities
//! - Create the directory shared with the proxy
//! - Bind the registration API listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to create config directory {path}: {source}")]
    ConfigDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Create the shared config directory if it does not exist yet.
pub async fn ensure_config_dir(dir: &Path) -> Result<(), StartupError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| StartupError::ConfigDir {
            path: dir.display().to_string(),
            source,
        })
}

/// Bind the TCP listener for the registration API.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, StartupError> {
    let address = config.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    if let Ok(local_addr) = listener.local_addr() {
        tracing::info!(address = %local_addr, "Listening for connections");
    }
    Ok(listener)
}
