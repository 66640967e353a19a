//! Line-oriented TCP Chat Server Library
//!
//! A multi-client text chat over plain TCP: one line per message, `/`
//! commands for renaming, private messages, listing and leaving.
//!
//! # Features
//! - Placeholder names (`User<n>`) and `/nick` renaming
//! - Public broadcast and `/msg` private messages
//! - `/list` roster and `/quit`
//! - Append-only activity log
//! - Operator console on the server's stdin (`clients`, `logs [N]`, `shutdown`)
//!
//! # Architecture
//! A single event loop owns all state:
//! - `ChatServer` multiplexes the listener, admin input and read events
//! - Each connection has a reader task that only forwards what it read
//! - `Room` executes commands against the `Registry` and the `ActivityLog`
//! - No locks needed - the registry is only touched from the loop
//!
//! # Example
//! ```ignore
//! use textchat::{ActivityLog, ChatServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = ChatServer::bind("127.0.0.1:12345", ActivityLog::disabled())
//!         .await
//!         .unwrap();
//!     server.run(tokio::io::stdin()).await.unwrap();
//! }
//! ```

pub mod activity;
pub mod admin;
pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod fanout;
pub mod handler;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use activity::{ActivityEvent, ActivityLog};
pub use admin::{AdminCommand, AdminReply};
pub use client::{run_session, SessionEnd};
pub use connection::Connection;
pub use error::{ClientError, CommandError, LogError, RegistryError, SendError, ServerError};
pub use handler::{read_connection, ReadEvent};
pub use message::{Command, ServerMessage};
pub use registry::Registry;
pub use room::Room;
pub use server::ChatServer;
pub use types::ConnectionId;
