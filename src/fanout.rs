//! Message fanout
//!
//! Delivery of rendered text to one or many registry members.

use tracing::debug;

use crate::error::SendError;
use crate::registry::Registry;
use crate::types::ConnectionId;

impl Registry {
    /// Send `text` to the connection with handle `id`
    pub async fn send_to(&mut self, id: ConnectionId, text: &str) -> Result<usize, SendError> {
        let index = self.find_by_handle(id).ok_or(SendError::NotConnected(id))?;
        match self.get_mut(index) {
            Some(conn) => conn.send(text).await,
            None => Err(SendError::NotConnected(id)),
        }
    }

    /// Send `text` to every member except `exclude`
    ///
    /// Per-recipient failures are not reported to the caller; the broken
    /// connection is cleaned up when its reader sees the stream end.
    /// Returns the number of members that accepted the whole text.
    pub async fn broadcast(&mut self, text: &str, exclude: Option<ConnectionId>) -> usize {
        let mut delivered = 0;
        for conn in self.iter_mut() {
            if Some(conn.id) == exclude {
                continue;
            }
            match conn.send(text).await {
                Ok(_) => delivered += 1,
                Err(e) => debug!("Broadcast to {} failed: {}", conn.id, e),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{member, pending};

    #[tokio::test]
    async fn test_send_to_single_member() {
        let mut registry = Registry::new();
        let mut a = member(&mut registry, 1);
        let mut b = member(&mut registry, 2);

        registry.send_to(ConnectionId(2), "hi\n").await.unwrap();

        assert_eq!(pending(&mut a).await, "");
        assert_eq!(pending(&mut b).await, "hi\n");
    }

    #[tokio::test]
    async fn test_send_to_unknown_handle() {
        let mut registry = Registry::new();
        let err = registry.send_to(ConnectionId(9), "hi\n").await.unwrap_err();
        assert!(matches!(err, SendError::NotConnected(ConnectionId(9))));
    }

    #[tokio::test]
    async fn test_broadcast_skips_excluded_and_sends_once() {
        let mut registry = Registry::new();
        let mut a = member(&mut registry, 1);
        let mut b = member(&mut registry, 2);
        let mut c = member(&mut registry, 3);

        let delivered = registry.broadcast("news\n", Some(ConnectionId(2))).await;

        assert_eq!(delivered, 2);
        assert_eq!(pending(&mut a).await, "news\n");
        assert_eq!(pending(&mut b).await, "");
        assert_eq!(pending(&mut c).await, "news\n");
    }

    #[tokio::test]
    async fn test_broadcast_without_exclusion_reaches_all() {
        let mut registry = Registry::new();
        let mut a = member(&mut registry, 1);
        let mut b = member(&mut registry, 2);

        assert_eq!(registry.broadcast("all\n", None).await, 2);
        assert_eq!(pending(&mut a).await, "all\n");
        assert_eq!(pending(&mut b).await, "all\n");
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_dead_peer() {
        let mut registry = Registry::new();
        let a = member(&mut registry, 1);
        let mut b = member(&mut registry, 2);
        drop(a);

        let delivered = registry.broadcast("still here\n", None).await;

        assert_eq!(delivered, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(pending(&mut b).await, "still here\n");
    }
}
