//! Helpers shared by unit tests

use std::time::Duration;

use tokio::io::{AsyncReadExt, DuplexStream};

use crate::connection::Connection;
use crate::registry::Registry;
use crate::types::ConnectionId;

/// Register an in-memory participant and return the peer's end
pub fn member(registry: &mut Registry, id: u64) -> DuplexStream {
    let (server_side, peer) = tokio::io::duplex(64 * 1024);
    registry
        .add(Connection::new(ConnectionId(id), server_side))
        .unwrap();
    peer
}

/// Everything currently buffered for `peer`
pub async fn pending(peer: &mut DuplexStream) -> String {
    let mut out = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let read = tokio::time::timeout(Duration::from_millis(20), peer.read(&mut buf)).await;
        match read {
            Ok(Ok(n)) if n > 0 => out.extend_from_slice(&buf[..n]),
            _ => break,
        }
    }
    String::from_utf8(out).unwrap()
}
