//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use devroute::{RegistryConfig, RegistryServer, RoutingDocument, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A registration server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub artifact: PathBuf,
    pub shutdown: Shutdown,
    // Keeps the shared directory alive for the test's duration
    _dir: TempDir,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Parse the routing document currently on disk.
    pub async fn read_artifact(&self) -> RoutingDocument {
        let contents = tokio::fs::read_to_string(&self.artifact).await.unwrap();
        serde_yaml::from_str(&contents).unwrap()
    }

    pub async fn route_names(&self) -> Vec<String> {
        self.read_artifact().await.http.routers.keys().cloned().collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with a short heartbeat timeout.
pub async fn start_server(heartbeat_timeout: Duration) -> TestServer {
    let dir = tempfile::tempdir().unwrap();

    let mut config = RegistryConfig::default();
    config.routing.config_dir = dir.path().to_path_buf();
    config.liveness.heartbeat_timeout = heartbeat_timeout;
    config.liveness.sweep_interval = heartbeat_timeout / 6;
    config.liveness.client_heartbeat_interval = heartbeat_timeout / 3;
    devroute::config::validate_config(&config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = RegistryServer::new(config);
    let artifact = server.publisher().path().to_path_buf();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for the initial document, which is written before serving starts
    for _ in 0..50 {
        if artifact.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    TestServer {
        addr,
        artifact,
        shutdown,
        _dir: dir,
    }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
