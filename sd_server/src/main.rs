//! Multi-room seotda server using an async actor model.
//!
//! Each room runs as its own actor task; the gateway maps WebSocket
//! commands onto actor messages and pushes redacted room views back to
//! clients.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use ctrlc::set_handler;
use pico_args::Arguments;
use sd_server::{api, config::ServerConfig, logging, metrics};
use seotda::room::RoomManager;
use tracing::info;

const HELP: &str = "\
Run a multi-room seotda server

USAGE:
  sd_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:7788]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  METRICS_BIND             Prometheus exporter bind address (disabled when unset)
  ROOM_START_CHIPS         Default starting stack for new rooms
  ROOM_ANTE                Default ante for new rooms
  ROOM_NEXT_ROUND_DELAY_MS Delay before the next round auto-starts
  RUST_LOG                 Log filter (e.g., info, seotda=debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let server_config = ServerConfig::from_env(bind_override)
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    if let Some(metrics_bind) = server_config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(Error::msg)?;
        info!("Metrics exporter listening at http://{metrics_bind}/metrics");
    }

    let room_manager = Arc::new(RoomManager::new());
    let state = api::AppState::new(room_manager, Arc::new(server_config.clone()));
    let app = api::create_router(state);

    info!("Starting HTTP/WebSocket server on {}", server_config.bind);
    let listener = tokio::net::TcpListener::bind(server_config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {e}", server_config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        server_config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
