//! LineKV Server Binary
//!
//! Starts the TCP server for LineKV.

use std::sync::Arc;
use clap::Parser;
use linekv::{Config, Engine};
use linekv::network::Server;
use tracing_subscriber::{fmt, EnvFilter};

/// LineKV Server
#[derive(Parser, Debug)]
#[command(name = "linekv-server")]
#[command(about = "Line-oriented TCP key-value store")]
#[command(version)]
struct Args {
    /// Host or IP to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// TCP port to bind
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Directory holding db.json
    #[arg(short, long, env = "DATA_DIR", default_value = "/data")]
    data_dir: String,

    /// Refuse connections above this many (unbounded when unset)
    #[arg(short, long, env = "MAX_CONNECTIONS")]
    max_connections: Option<usize>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,linekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("LineKV Server v{}", linekv::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);

    // Build config from args
    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .data_dir(&args.data_dir)
        .max_connections(args.max_connections)
        .build();

    // Open engine (loads the snapshot)
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized with {} keys", engine.store().len());

    let server = match Server::bind(config, engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
