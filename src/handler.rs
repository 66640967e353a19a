//! Per-connection reader task
//!
//! Reads one buffer at a time from a connection's read half and forwards
//! what happened to the event loop. The task never touches the registry.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::ConnectionId;

/// Size of one read
pub const READ_BUFFER_SIZE: usize = 4096;

/// Readiness reported by a reader task
#[derive(Debug)]
pub enum ReadEvent {
    /// Bytes from one read call
    Data { id: ConnectionId, bytes: Vec<u8> },
    /// Peer closed its end
    Closed { id: ConnectionId },
    /// Read failed
    Failed { id: ConnectionId, error: std::io::Error },
}

impl ReadEvent {
    pub fn id(&self) -> ConnectionId {
        match self {
            ReadEvent::Data { id, .. } | ReadEvent::Closed { id } | ReadEvent::Failed { id, .. } => {
                *id
            }
        }
    }
}

/// Read `reader` until end-of-stream or error
///
/// Each successful read becomes one `Data` event; the final event is
/// `Closed` or `Failed`. Stops early if the event loop is gone.
pub async fn read_connection<R>(id: ConnectionId, mut reader: R, events: mpsc::Sender<ReadEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let (event, last) = match reader.read(&mut buf).await {
            Ok(0) => (ReadEvent::Closed { id }, true),
            Ok(n) => (
                ReadEvent::Data {
                    id,
                    bytes: buf[..n].to_vec(),
                },
                false,
            ),
            Err(error) => (ReadEvent::Failed { id, error }, true),
        };

        if events.send(event).await.is_err() {
            debug!("Event loop closed, ending read task for {}", id);
            break;
        }
        if last {
            break;
        }
    }
    debug!("Read task ended for {}", id);
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn test_forwards_data_then_closed() {
        let (reader, mut peer) = tokio::io::duplex(64);
        let (tx, mut rx) = mpsc::channel(8);
        let task = tokio::spawn(read_connection(ConnectionId(3), reader, tx));

        peer.write_all(b"hello\n").await.unwrap();
        match rx.recv().await.unwrap() {
            ReadEvent::Data { id, bytes } => {
                assert_eq!(id, ConnectionId(3));
                assert_eq!(bytes, b"hello\n");
            }
            other => panic!("Wrong event: {other:?}"),
        }

        drop(peer);
        assert!(matches!(
            rx.recv().await.unwrap(),
            ReadEvent::Closed { id: ConnectionId(3) }
        ));
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_reports_read_errors() {
        let reader = reset_reader();
        let (tx, mut rx) = mpsc::channel(8);

        read_connection(ConnectionId(1), reader, tx).await;

        let event = rx.recv().await.unwrap();
        assert_eq!(event.id(), ConnectionId(1));
        assert!(matches!(event, ReadEvent::Failed { .. }));
    }

    /// A reader whose first read fails with a reset
    fn reset_reader() -> impl AsyncRead + Unpin {
        struct Reset;
        impl AsyncRead for Reset {
            fn poll_read(
                self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                _buf: &mut tokio::io::ReadBuf<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                std::task::Poll::Ready(Err(std::io::ErrorKind::ConnectionReset.into()))
            }
        }
        Reset
    }
}
