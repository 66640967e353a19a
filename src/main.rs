//! Chat Server - Entry Point
//!
//! Opens the activity log, binds the listener and runs the event loop with
//! stdin as the operator console.

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use textchat::config::ServerArgs;
use textchat::{ActivityLog, ChatServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=textchat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textchat=info")),
        )
        .init();

    let args = ServerArgs::parse();

    let log = match ActivityLog::open(&args.log_file).await {
        Ok(log) => log,
        Err(e) => {
            warn!(
                "Cannot open {}: {}; running without activity log",
                args.log_file.display(),
                e
            );
            ActivityLog::disabled()
        }
    };

    let addr = args.listen_addr();
    let server = ChatServer::bind(addr, log).await?;
    info!("Server listening on port {}", args.port);

    let code = match server.run(tokio::io::stdin()).await {
        Ok(()) => 0,
        Err(e) => {
            error!("Event loop failed: {}", e);
            1
        }
    };

    // The stdin reader sits on a blocking thread that would keep the
    // runtime alive until the next line is typed
    std::process::exit(code);
}
