//! Persistence of the routing document.
//!
//! # Responsibilities
//! - Snapshot the registry, generate and serialize the document
//! - Replace the artifact atomically (temp file + rename in the same directory)
//! - Report failures without touching registry state
//!
//! # Design Decisions
//! - One writer at a time: the snapshot is taken under the publisher's lock,
//!   so a later write never carries an older snapshot than an earlier one
//! - Identical bytes are not rewritten, so the watching proxy does not reload
//!   for nothing. The comparison is against the last successful write; if the
//!   artifact has since disappeared from disk it is written again
//! - A failed write leaves the remembered bytes alone; the next trigger retries

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::Mutex;

use crate::config::RoutingConfig;
use crate::observability::metrics;
use crate::registry::Registry;
use crate::routing::document::{generate, RouteTemplate};

/// Error type for artifact persistence.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize routing document: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The artifact was replaced; carries the route count.
    Written(usize),
    /// The generated bytes matched the last write.
    Unchanged(usize),
}

/// Writes the routing document to the directory shared with the proxy.
#[derive(Debug)]
pub struct ConfigPublisher {
    path: PathBuf,
    template: RouteTemplate,
    last_written: Mutex<Option<String>>,
}

impl ConfigPublisher {
    pub fn new(dir: impl Into<PathBuf>, file_name: &str, template: RouteTemplate) -> Self {
        Self {
            path: dir.into().join(file_name),
            template,
            last_written: Mutex::new(None),
        }
    }

    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new(&config.config_dir, &config.file_name, RouteTemplate::from(config))
    }

    /// Location of the generated artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    /// Regenerate the artifact from the current registry contents.
    pub async fn publish(&self, registry: &Registry) -> Result<PublishOutcome, PublishError> {
        let start = Instant::now();
        let mut last_written = self.last_written.lock().await;

        let snapshot = registry.snapshot();
        let doc = generate(&snapshot, &self.template);
        let routes = doc.route_count();
        let yaml = doc.to_yaml()?;

        if last_written.as_deref() == Some(yaml.as_str()) && self.artifact_present().await {
            metrics::record_config_write("unchanged", start);
            return Ok(PublishOutcome::Unchanged(routes));
        }

        self.write_atomic(&yaml).await?;
        *last_written = Some(yaml);
        metrics::record_config_write("written", start);

        Ok(PublishOutcome::Written(routes))
    }

    /// Publish and log the outcome. Failures never propagate.
    pub async fn regenerate(&self, registry: &Registry) {
        match self.publish(registry).await {
            Ok(PublishOutcome::Written(routes)) => {
                tracing::info!(path = %self.path.display(), routes, "Generated proxy config");
            }
            Ok(PublishOutcome::Unchanged(routes)) => {
                tracing::debug!(routes, "Proxy config unchanged, skipping write");
            }
            Err(e) => {
                metrics::record_config_write_failure();
                tracing::error!(path = %self.path.display(), error = %e, "Failed to write proxy config");
            }
        }
    }

    async fn artifact_present(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Hold the writer lock, stalling every publish until the guard drops.
    #[cfg(test)]
    pub(crate) async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, Option<String>> {
        self.last_written.lock().await
    }

    async fn write_atomic(&self, contents: &str) -> Result<(), PublishError> {
        let temp_path = self.temp_path();

        if let Err(source) = tokio::fs::write(&temp_path, contents).await {
            return Err(PublishError::Io { path: temp_path, source });
        }

        if let Err(source) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PublishError::Io { path: self.path.clone(), source });
        }

        Ok(())
    }

    // Same directory as the target so the rename stays on one filesystem.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
