//! Chat Client - Entry Point
//!
//! Connects to a chat server and relays the terminal to it.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use textchat::client::{connect, run_session};
use textchat::config::ClientArgs;

#[tokio::main]
async fn main() {
    // Chat output owns stdout; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textchat=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = ClientArgs::parse();

    let stream = match connect(&args.host, args.port).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let code = match run_session(stream, tokio::io::stdin(), tokio::io::stdout()).await {
        Ok(_) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    };

    // Same as the server: do not wait on the blocking stdin reader
    std::process::exit(code);
}
