//! Command line configuration
//!
//! Both binaries take their settings from arguments parsed with clap.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

/// Default listening port
pub const DEFAULT_PORT: u16 = 12345;

/// Default activity log file
pub const DEFAULT_LOG_FILE: &str = "chat.log";

/// Chat server arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "chat-server", version, about = "Line-oriented multi-client chat server")]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Activity log file (appended to)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl ServerArgs {
    /// Listening address as `ip:port`
    pub fn listen_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.bind, self.port)
    }
}

/// Chat client arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "chat-client", version, about = "Interactive chat client")]
pub struct ClientArgs {
    /// Server host name or IP
    pub host: String,

    /// Server port
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let args = ServerArgs::try_parse_from(["chat-server"]).unwrap();
        assert_eq!(args.port, DEFAULT_PORT);
        assert_eq!(args.listen_addr().to_string(), "0.0.0.0:12345");
        assert_eq!(args.log_file, PathBuf::from("chat.log"));
    }

    #[test]
    fn test_server_overrides() {
        let args = ServerArgs::try_parse_from([
            "chat-server",
            "4000",
            "--bind",
            "127.0.0.1",
            "--log-file",
            "/tmp/x.log",
        ])
        .unwrap();
        assert_eq!(args.listen_addr().to_string(), "127.0.0.1:4000");
        assert_eq!(args.log_file, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_client_requires_host_and_port() {
        assert!(ClientArgs::try_parse_from(["chat-client", "localhost"]).is_err());
        let args = ClientArgs::try_parse_from(["chat-client", "localhost", "12345"]).unwrap();
        assert_eq!(args.host, "localhost");
        assert_eq!(args.port, 12345);
    }
}
