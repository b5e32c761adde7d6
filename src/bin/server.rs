//! Cellar Server Binary
//!
//! Starts the TCP server for Cellar.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use cellar::network::Server;
use cellar::Config;
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing_subscriber::{fmt, EnvFilter};

/// Cellar Server
#[derive(Parser, Debug)]
#[command(name = "cellar-server")]
#[command(about = "Minimal table store with encrypted snapshots")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7379")]
    listen: String,

    /// Longest accepted command line in bytes
    #[arg(long, default_value = "4096")]
    max_line_length: usize,

    /// Username seeded into every new session
    #[arg(long, default_value = cellar::auth::DEFAULT_BOOTSTRAP_USER)]
    bootstrap_user: String,

    /// Password of the seeded user
    #[arg(long, default_value = cellar::auth::DEFAULT_BOOTSTRAP_PASSWORD)]
    bootstrap_password: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.log_file.as_ref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Cellar Server v{}", cellar::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_line_length(args.max_line_length)
        .bootstrap_credentials(&args.bootstrap_user, &args.bootstrap_password)
        .build();

    let mut server = Server::new(config);

    // Ctrl+C / SIGTERM set the shutdown flag; the accept loop polls it
    let shutdown = server.shutdown_handle();
    for signal in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(signal, shutdown.flag()) {
            tracing::warn!("Failed to register handler for signal {}: {}", signal, e);
        }
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Initialize tracing, writing to stderr or to a mutex-guarded log file
fn init_logging(log_file: Option<&PathBuf>) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cellar=debug"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.init(),
    }
    Ok(())
}
