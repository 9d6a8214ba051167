//! In-memory client registry.
//!
//! # Responsibilities
//! - Own the set of live clients keyed by canonical id
//! - Serialize every mutation behind one reader/writer lock
//! - Hand out consistent point-in-time snapshots
//!
//! # Design Decisions
//! - Registration is not an upsert: duplicates must unregister first
//! - Snapshots are cloned under the read lock and sorted by canonical id
//! - The registry knows nothing about the proxy document format

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::observability::metrics;
use crate::registry::name::{canonicalize, validate};

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid subdomain format: {0:?}")]
    InvalidIdentifier(String),
    #[error("invalid port: {0}")]
    InvalidPort(i64),
    #[error("subdomain already in use: {0}")]
    AlreadyRegistered(String),
    #[error("client not found: {0}")]
    NotFound(String),
}

impl RegistryError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::InvalidIdentifier(_) => "invalid_identifier",
            RegistryError::InvalidPort(_) => "invalid_port",
            RegistryError::AlreadyRegistered(_) => "conflict",
            RegistryError::NotFound(_) => "not_found",
        }
    }
}

/// One live registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    /// Map key derived from `display_name`.
    pub canonical_id: String,
    /// Identifier as supplied by the client, dots preserved.
    pub display_name: String,
    /// Local port the proxy forwards to.
    pub port: u16,
    pub last_heartbeat: DateTime<Utc>,
}

/// Concurrent-safe store of live clients.
#[derive(Debug, Default)]
pub struct Registry {
    clients: RwLock<HashMap<String, ClientRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking writer can only interrupt a single map operation, so the
    // map behind a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ClientRecord>> {
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ClientRecord>> {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new client.
    ///
    /// Fails if the identifier or port is invalid, or if the canonical id is
    /// already live.
    pub fn register(&self, display_name: &str, port: i64) -> Result<ClientRecord, RegistryError> {
        if !validate(display_name) {
            return Err(RegistryError::InvalidIdentifier(display_name.to_string()));
        }
        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(RegistryError::InvalidPort(port))?;

        let canonical_id = canonicalize(display_name);
        let mut clients = self.write();
        if clients.contains_key(&canonical_id) {
            return Err(RegistryError::AlreadyRegistered(display_name.to_string()));
        }

        let record = ClientRecord {
            canonical_id: canonical_id.clone(),
            display_name: display_name.to_string(),
            port,
            last_heartbeat: Utc::now(),
        };
        clients.insert(canonical_id, record.clone());
        metrics::set_live_clients(clients.len());

        Ok(record)
    }

    /// Refresh the liveness timestamp of a registered client.
    pub fn heartbeat(&self, identifier: &str) -> Result<(), RegistryError> {
        let mut clients = self.write();
        match clients.get_mut(&canonicalize(identifier)) {
            Some(record) => {
                record.last_heartbeat = Utc::now();
                Ok(())
            }
            None => Err(RegistryError::NotFound(identifier.to_string())),
        }
    }

    /// Remove a registered client.
    pub fn unregister(&self, identifier: &str) -> Result<(), RegistryError> {
        let mut clients = self.write();
        if clients.remove(&canonicalize(identifier)).is_none() {
            return Err(RegistryError::NotFound(identifier.to_string()));
        }
        metrics::set_live_clients(clients.len());
        Ok(())
    }

    /// Consistent copy of every live record, ordered by canonical id.
    pub fn snapshot(&self) -> Vec<ClientRecord> {
        let mut records: Vec<ClientRecord> = self.read().values().cloned().collect();
        records.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
        records
    }

    /// Evict every client whose last heartbeat is older than `timeout` at `now`.
    ///
    /// Returns the evicted canonical ids, sorted.
    pub fn expire_stale(&self, now: DateTime<Utc>, timeout: Duration) -> Vec<String> {
        let timeout = chrono::Duration::from_std(timeout).unwrap_or(chrono::Duration::MAX);

        let mut clients = self.write();
        let mut expired: Vec<String> = clients
            .values()
            .filter(|record| now.signed_duration_since(record.last_heartbeat) > timeout)
            .map(|record| record.canonical_id.clone())
            .collect();

        for id in &expired {
            clients.remove(id);
        }
        if !expired.is_empty() {
            metrics::set_live_clients(clients.len());
        }
        drop(clients);

        expired.sort();
        expired
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
