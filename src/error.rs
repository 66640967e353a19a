//! Error types for the chat server
//!
//! Fatal server errors, per-connection send errors, registry errors and
//! user-input errors. Uses thiserror for ergonomic error definitions.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::types::ConnectionId;

/// Fatal server errors
///
/// Only setup and the event loop itself produce these; they end the process.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Every reader task and the loop's own sender are gone
    #[error("read event source closed")]
    EventSourceClosed,
}

/// Message send errors
///
/// Local to one connection; fanout swallows them.
#[derive(Debug, Error)]
pub enum SendError {
    /// The peer refused or reset the stream
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),

    /// No registry entry carries this handle
    #[error("connection {0} not found")]
    NotConnected(ConnectionId),
}

/// Registry mutation errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Backing storage could not grow (fatal for that accept)
    #[error("registry allocation failed: {0}")]
    Exhausted(#[from] TryReserveError),

    /// Handle already present
    #[error("connection {0} already registered")]
    DuplicateHandle(ConnectionId),
}

/// User-input errors
///
/// The Display text is the exact line sent back to the originator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `/msg` without a target or a body
    #[error("Usage: /msg <user> <message>")]
    MsgUsage,

    /// Private message target (or sender) not in the registry
    #[error("User not found.")]
    UserNotFound,
}

/// Activity log read errors
#[derive(Debug, Error)]
pub enum LogError {
    /// The server runs without a log file
    #[error("no log file open")]
    Disabled,

    /// Reading the log file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server unreachable
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error on the terminal or the socket
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
