//! Connection registry
//!
//! Ordered collection of live connections. Removal swaps the last entry
//! into the freed slot, so positions are not stable across removals:
//! callers resolve indices right before use and walk back-to-front when
//! removing during a pass.

use tracing::debug;

use crate::connection::Connection;
use crate::error::RegistryError;
use crate::types::ConnectionId;

/// Live connections in (mostly) insertion order
///
/// Invariant: no two entries share a handle.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Connection>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a connection
    ///
    /// Fails if the handle is already registered or storage cannot grow.
    /// On failure the connection is dropped, which closes it.
    pub fn add(&mut self, conn: Connection) -> Result<(), RegistryError> {
        if self.find_by_handle(conn.id).is_some() {
            return Err(RegistryError::DuplicateHandle(conn.id));
        }
        self.entries.try_reserve(1)?;
        debug!("Registered connection {} as '{}'", conn.id, conn.name());
        self.entries.push(conn);
        Ok(())
    }

    /// Remove and close the entry at `index`
    ///
    /// No-op when `index` is out of bounds. The last entry moves into
    /// `index`.
    pub fn remove(&mut self, index: usize) -> Option<ConnectionId> {
        if index >= self.entries.len() {
            return None;
        }
        let conn = self.entries.swap_remove(index);
        debug!("Removed connection {} ('{}')", conn.id, conn.name());
        Some(conn.id)
    }

    /// First entry, in current order, whose name equals `name`
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|c| c.name() == name)
    }

    pub fn find_by_handle(&self, id: ConnectionId) -> Option<usize> {
        self.entries.iter().position(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Connection> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Connection> {
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Connection> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Connection> {
        self.entries.iter_mut()
    }
}
