//! Connection struct definition
//!
//! Represents one live participant: its handle, display name, the write
//! half of its transport and the task reading the other half.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::task::AbortHandle;

use crate::error::SendError;
use crate::types::{bounded_name, ConnectionId};

/// Write side of a participant's transport
pub type Outbound = Box<dyn AsyncWrite + Send + Sync + Unpin>;

/// Connected participant
///
/// Dropping a `Connection` closes it: the write half is dropped and the
/// reader task is aborted, which releases the read half.
pub struct Connection {
    /// Unique handle for this connection
    pub id: ConnectionId,
    name: String,
    writer: Outbound,
    reader: Option<AbortHandle>,
}

impl Connection {
    /// Create a connection with the placeholder name derived from `id`
    pub fn new<W>(id: ConnectionId, writer: W) -> Self
    where
        W: AsyncWrite + Send + Sync + Unpin + 'static,
    {
        Self {
            id,
            name: id.placeholder_name(),
            writer: Box::new(writer),
            reader: None,
        }
    }

    /// Attach the task reading this connection so removal can stop it
    pub fn with_reader(mut self, reader: AbortHandle) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the display name, truncated to the name bound
    ///
    /// Returns the previous name.
    pub fn rename(&mut self, name: &str) -> String {
        std::mem::replace(&mut self.name, bounded_name(name))
    }

    /// Write `text` completely
    ///
    /// `write_all` keeps going across partial writes; a peer that stops
    /// accepting bytes surfaces as an error, not a panic.
    pub async fn send(&mut self, text: &str) -> Result<usize, SendError> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(text.len())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
