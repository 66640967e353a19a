//! ChatServer event loop
//!
//! The single place where the listener, the administrative input and the
//! connections' read events are multiplexed. The loop owns the `Room`, so
//! no other task can observe the registry mid-mutation.

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::activity::ActivityLog;
use crate::admin::{AdminCommand, AdminReply};
use crate::connection::Connection;
use crate::error::ServerError;
use crate::handler::{read_connection, ReadEvent};
use crate::room::Room;
use crate::types::ConnectionId;

/// Channel buffer size for read events
const EVENT_BUFFER_SIZE: usize = 256;

/// The main ChatServer
pub struct ChatServer {
    listener: TcpListener,
    room: Room,
    events_tx: mpsc::Sender<ReadEvent>,
    events_rx: mpsc::Receiver<ReadEvent>,
    next_id: u64,
}

impl ChatServer {
    /// Bind the listener
    pub async fn bind<A>(addr: A, log: ActivityLog) -> Result<Self, ServerError>
    where
        A: ToSocketAddrs + std::fmt::Display,
    {
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER_SIZE);
        Ok(Self {
            listener,
            room: Room::new(log),
            events_tx,
            events_rx,
            next_id: 1,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the event loop
    ///
    /// Returns when the `shutdown` admin command is read. Connected clients
    /// are not notified; their transports close when the server is dropped.
    /// End of `admin` only stops polling it.
    pub async fn run<A>(mut self, admin: A) -> Result<(), ServerError>
    where
        A: AsyncRead + Unpin,
    {
        info!("ChatServer started");
        let mut admin = Some(BufReader::new(admin).lines());

        loop {
            let mut ready = Vec::new();

            tokio::select! {
                biased;

                line = next_admin_line(&mut admin) => match line {
                    Ok(Some(line)) => {
                        if self.handle_admin(&line).await {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("Admin input closed");
                        admin = None;
                    }
                    Err(e) => {
                        error!("Failed to read admin input: {}", e);
                        admin = None;
                    }
                },

                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => self.accept(stream, peer).await,
                    Err(e) => error!("Failed to accept connection: {}", e),
                },

                event = self.events_rx.recv() => match event {
                    Some(event) => ready.push(event),
                    None => return Err(ServerError::EventSourceClosed),
                },
            }

            // Every wake also serves the reads already queued, so a busy
            // listener or console cannot starve connected clients
            while let Ok(event) = self.events_rx.try_recv() {
                ready.push(event);
            }
            if !ready.is_empty() {
                self.service(ready).await;
            }
        }

        info!("ChatServer shutting down");
        Ok(())
    }

    /// Handle one admin line; returns true on shutdown
    async fn handle_admin(&mut self, line: &str) -> bool {
        match AdminCommand::parse(line).execute(&self.room).await {
            AdminReply::Output(text) => {
                print!("{text}");
                false
            }
            AdminReply::Shutdown(text) => {
                print!("{text}");
                true
            }
        }
    }

    /// Register a new connection and start reading it
    async fn accept(&mut self, stream: TcpStream, peer: SocketAddr) {
        let id = ConnectionId(self.next_id);
        self.next_id += 1;

        let (reader, writer) = stream.into_split();
        let task = tokio::spawn(read_connection(id, reader, self.events_tx.clone()));
        let conn = Connection::new(id, writer).with_reader(task.abort_handle());

        if let Err(e) = self.room.join(conn, peer).await {
            error!("Failed to register connection from {}: {}", peer, e);
        }
    }

    /// Service one batch of read events
    ///
    /// Walks the registry back-to-front: removal moves the last entry into
    /// the freed slot, and that entry has already been visited.
    async fn service(&mut self, ready: Vec<ReadEvent>) {
        let mut pending: HashMap<ConnectionId, Vec<ReadEvent>> = HashMap::new();
        for event in ready {
            pending.entry(event.id()).or_default().push(event);
        }

        for index in (0..self.room.registry().len()).rev() {
            let Some(id) = self.room.registry().get(index).map(|c| c.id) else {
                continue;
            };
            let Some(events) = pending.remove(&id) else {
                continue;
            };
            for event in events {
                if self.room.registry().find_by_handle(id).is_none() {
                    break;
                }
                match event {
                    ReadEvent::Data { bytes, .. } => self.room.handle_data(id, &bytes).await,
                    ReadEvent::Closed { .. } => self.room.handle_closed(id).await,
                    ReadEvent::Failed { error, .. } => self.room.handle_failed(id, &error),
                }
            }
        }

        for id in pending.keys() {
            debug!("Dropping events for closed connection {}", id);
        }
    }
}

async fn next_admin_line<R>(admin: &mut Option<Lines<R>>) -> std::io::Result<Option<String>>
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    match admin {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}
