use std::process::ExitCode;

use clap::Parser;
use tokio::process::Command;

use devroute::client::heartbeat::DEFAULT_HEARTBEAT_INTERVAL;
use devroute::client::port::{DEFAULT_ATTEMPTS, DEFAULT_PORT_RANGE};
use devroute::client::process::DEFAULT_GRACE_PERIOD;
use devroute::client::{find_free_port, run_heartbeats, terminate, RegistrationClient};
use devroute::lifecycle::{signals, Shutdown};
use devroute::observability::logging;

#[derive(Parser)]
#[command(name = "devroute-client")]
#[command(about = "Run a dev server behind <id>.localhost", long_about = None)]
#[command(after_help = "Examples:\n  devroute-client -s http://localhost:8080 -i myapp -- npm run dev\n  ID=api devroute-client -p 3035 -- node server.js")]
struct Cli {
    /// Registration server URL
    #[arg(short, long, env = "SERVER", default_value = "http://localhost:8080")]
    server: String,

    /// Client identifier (becomes the subdomain)
    #[arg(short, long, env = "ID", default_value = "myapp")]
    id: String,

    /// Port the command listens on (random free port in 3000-3100 if unset)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Command to run, after `--`
    #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging("info");
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let port = match cli.port {
        Some(port) => port,
        None => find_free_port(DEFAULT_PORT_RANGE, DEFAULT_ATTEMPTS)
            .ok_or("failed to find a free port in range 3000-3100")?,
    };

    let client = RegistrationClient::new(&cli.server, &cli.id)?;
    let url = client.register(port).await?;
    tracing::info!(url = %url, port, "Registered");

    let (program, args) = cli
        .command
        .split_first()
        .ok_or("no command provided")?;

    let mut child = match Command::new(program).args(args).env("PORT", port.to_string()).spawn() {
        Ok(child) => child,
        Err(e) => {
            let _ = client.unregister().await;
            return Err(format!("failed to start {}: {}", program, e).into());
        }
    };

    let shutdown = Shutdown::new();
    let heartbeats = tokio::spawn(run_heartbeats(
        client,
        DEFAULT_HEARTBEAT_INTERVAL,
        shutdown.subscribe(),
    ));

    let status = tokio::select! {
        status = child.wait() => Some(status?),
        _ = signals::wait_for_signal() => None,
    };

    shutdown.trigger();
    let _ = heartbeats.await;

    let status = match status {
        Some(status) => status,
        None => terminate(&mut child, DEFAULT_GRACE_PERIOD).await?,
    };

    let code = status.code().unwrap_or(1);
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
