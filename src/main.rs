//! Local development hostname registry.
//!
//! Development processes register `{id, port}` over HTTP and keep themselves
//! alive with heartbeats. The live set is rendered into a dynamic routing
//! document in a directory watched by a reverse proxy, which then serves
//! each process at `<id>.localhost`.
//!
//! # Architecture Overview
//!
//! ```text
//!   devroute-client ──register/heartbeat──▶ ┌──────────────┐
//!                                           │ http surface │
//!                                           └──────┬───────┘
//!                                                  ▼
//!   ┌──────────────┐   expire_stale         ┌──────────────┐
//!   │   sweeper    │──────────────────────▶ │   registry   │
//!   └──────┬───────┘                        └──────┬───────┘
//!          │              snapshot                 │
//!          └──────────────┬────────────────────────┘
//!                         ▼
//!                  ┌──────────────┐  temp + rename  ┌──────────────────┐
//!                  │  publisher   │────────────────▶│ /config/dynamic  │──▶ proxy
//!                  └──────────────┘                 └──────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use devroute::config::{resolve_config, ConfigOverrides};
use devroute::http::RegistryServer;
use devroute::lifecycle::{signals, startup, Shutdown};
use devroute::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "devroute")]
#[command(about = "Registers local dev servers and generates reverse-proxy routes for them", long_about = None)]
struct Cli {
    /// Optional TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port for the registration API
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory shared with the reverse proxy
    #[arg(long, env = "CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Evict clients after this long without a heartbeat (e.g. "30s")
    #[arg(long, env = "HEARTBEAT_TIMEOUT", value_parser = humantime::parse_duration)]
    heartbeat_timeout: Option<Duration>,

    /// Log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        port: cli.port,
        config_dir: cli.config_dir,
        heartbeat_timeout: cli.heartbeat_timeout,
        log_level: cli.log_level,
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    logging::init_logging(&config.observability.log_level);

    tracing::info!("devroute v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.listener.port,
        config_dir = %config.routing.config_dir.display(),
        heartbeat_timeout = ?config.liveness.heartbeat_timeout,
        sweep_interval = ?config.liveness.sweep_interval,
        "Configuration loaded"
    );

    startup::ensure_config_dir(&config.routing.config_dir).await?;

    if config.observability.metrics_enabled {
        // Address already validated
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = startup::bind_listener(&config.listener).await?;

    let shutdown = Shutdown::new();
    let _signals = signals::spawn_signal_handler(shutdown.clone());

    let server = RegistryServer::new(config);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
