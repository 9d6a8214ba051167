//! Routing document generation.
//!
//! # Responsibilities
//! - Turn a registry snapshot into the proxy's dynamic routing document
//! - Synthesize router/service names from canonical ids
//!
//! # Design Decisions
//! - Pure function of (snapshot, template), no I/O
//! - `BTreeMap` keeps entries sorted so identical snapshots serialize to
//!   identical bytes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RoutingConfig;
use crate::registry::ClientRecord;

/// Prefix for generated router names.
pub const ROUTER_PREFIX: &str = "sub-";

/// Prefix for generated service names.
pub const SERVICE_PREFIX: &str = "local-";

/// Fixed parts of every generated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    /// Domain appended to each client's display name.
    pub domain_suffix: String,
    /// Host the proxy uses to reach processes on the developer machine.
    pub upstream_host: String,
    /// Proxy entry points every router listens on.
    pub entry_points: Vec<String>,
}

impl RouteTemplate {
    /// Public hostname for a client identifier.
    pub fn hostname(&self, display_name: &str) -> String {
        format!("{}.{}", display_name, self.domain_suffix)
    }

    fn upstream_url(&self, port: u16) -> String {
        format!("http://{}:{}", self.upstream_host, port)
    }
}

impl Default for RouteTemplate {
    fn default() -> Self {
        Self::from(&RoutingConfig::default())
    }
}

impl From<&RoutingConfig> for RouteTemplate {
    fn from(config: &RoutingConfig) -> Self {
        Self {
            domain_suffix: config.domain_suffix.clone(),
            upstream_host: config.upstream_host.clone(),
            entry_points: config.entry_points.clone(),
        }
    }
}

/// Root of the dynamic configuration consumed by the proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDocument {
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSection {
    pub routers: BTreeMap<String, Router>,
    pub services: BTreeMap<String, Service>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    pub entry_points: Vec<String>,
    pub rule: String,
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub load_balancer: LoadBalancer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
}

impl RoutingDocument {
    /// Number of routes in the document.
    pub fn route_count(&self) -> usize {
        self.http.routers.len()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Build the routing document for a set of live clients.
pub fn generate(clients: &[ClientRecord], template: &RouteTemplate) -> RoutingDocument {
    let mut doc = RoutingDocument::default();

    for client in clients {
        let router_name = format!("{}{}", ROUTER_PREFIX, client.canonical_id);
        let service_name = format!("{}{}", SERVICE_PREFIX, client.canonical_id);

        doc.http.routers.insert(
            router_name,
            Router {
                entry_points: template.entry_points.clone(),
                rule: format!("Host(`{}`)", template.hostname(&client.display_name)),
                service: service_name.clone(),
            },
        );
        doc.http.services.insert(
            service_name,
            Service {
                load_balancer: LoadBalancer {
                    servers: vec![Server {
                        url: template.upstream_url(client.port),
                    }],
                },
            },
        );
    }

    doc
}
