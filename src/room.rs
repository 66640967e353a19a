//! Command interpreter
//!
//! `Room` binds the registry to the activity log and executes parsed
//! commands and connection lifecycle events against them. It is owned by
//! the event loop and never shared.

use std::net::SocketAddr;

use tracing::{debug, info, warn};

use crate::activity::{ActivityEvent, ActivityLog};
use crate::connection::Connection;
use crate::error::{CommandError, RegistryError};
use crate::message::{split_lines, Command, ServerMessage};
use crate::registry::Registry;
use crate::types::ConnectionId;

/// Registry plus activity log
#[derive(Debug)]
pub struct Room {
    registry: Registry,
    log: ActivityLog,
}

impl Room {
    pub fn new(log: ActivityLog) -> Self {
        Self {
            registry: Registry::new(),
            log,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Register a freshly accepted connection
    ///
    /// Announces it to everyone else, greets it and records the connect.
    pub async fn join(&mut self, conn: Connection, peer: SocketAddr) -> Result<(), RegistryError> {
        let id = conn.id;
        let name = conn.name().to_string();
        self.registry.add(conn)?;

        self.registry
            .broadcast(&ServerMessage::Joined { name: name.clone() }.to_string(), Some(id))
            .await;
        if let Err(e) = self.registry.send_to(id, &ServerMessage::Welcome.to_string()).await {
            debug!("Welcome to {} failed: {}", id, e);
        }

        info!("{} connected from {}", name, peer);
        self.log.record(ActivityEvent::Connect { name: &name, peer }).await;
        Ok(())
    }

    /// Dispatch every line of one read buffer, in order
    pub async fn handle_data(&mut self, id: ConnectionId, chunk: &[u8]) {
        for line in split_lines(chunk) {
            self.handle_line(id, &line).await;
        }
    }

    /// Parse and execute one command line from `id`
    pub async fn handle_line(&mut self, id: ConnectionId, line: &str) {
        match Command::parse(line) {
            Ok(cmd) => self.handle_command(id, cmd).await,
            Err(e) => self.reply_error(id, e).await,
        }
    }

    /// Execute a single command
    pub async fn handle_command(&mut self, id: ConnectionId, cmd: Command) {
        match cmd {
            Command::Rename { name } => self.handle_rename(id, &name).await,
            Command::PrivateMessage { target, body } => {
                self.handle_private(id, &target, &body).await
            }
            Command::ListUsers => self.handle_list(id).await,
            Command::Quit => self.handle_quit(id).await,
            Command::Broadcast { body } => self.handle_broadcast(id, &body).await,
        }
    }

    /// Peer closed its stream cleanly
    pub async fn handle_closed(&mut self, id: ConnectionId) {
        let Some(index) = self.registry.find_by_handle(id) else {
            return;
        };
        let name = self.name_at(index);

        self.registry
            .broadcast(&ServerMessage::Disconnected { name: name.clone() }.to_string(), Some(id))
            .await;
        info!("{} disconnected", name);
        self.log.record(ActivityEvent::Disconnect { name: &name }).await;

        if let Some(index) = self.registry.find_by_handle(id) {
            self.registry.remove(index);
        }
    }

    /// Read on the connection failed; drop it without an announcement
    pub fn handle_failed(&mut self, id: ConnectionId, error: &std::io::Error) {
        warn!("Read from connection {} failed: {}", id, error);
        if let Some(index) = self.registry.find_by_handle(id) {
            self.registry.remove(index);
        }
    }

    /// Handle `/nick`
    async fn handle_rename(&mut self, id: ConnectionId, name: &str) {
        let Some(conn) = self
            .registry
            .find_by_handle(id)
            .and_then(|index| self.registry.get_mut(index))
        else {
            return;
        };

        let old = conn.rename(name);
        let new = conn.name().to_string();

        let announcement = ServerMessage::Renamed {
            old: old.clone(),
            new: new.clone(),
        };
        self.registry.broadcast(&announcement.to_string(), None).await;

        info!("{} is now known as {}", old, new);
        self.log
            .record(ActivityEvent::Nick { old: &old, new: &new })
            .await;
    }

    /// Handle `/msg`
    async fn handle_private(&mut self, id: ConnectionId, target: &str, body: &str) {
        let target_index = self.registry.find_by_name(target);
        let sender_index = self.registry.find_by_handle(id);
        let (Some(target_index), Some(sender_index)) = (target_index, sender_index) else {
            self.reply_error(id, CommandError::UserNotFound).await;
            return;
        };

        let sender = self.name_at(sender_index);
        let target_name = self.name_at(target_index);
        let message = ServerMessage::Private {
            from: sender.clone(),
            body: body.to_string(),
        };

        if let Some(conn) = self.registry.get_mut(target_index) {
            if let Err(e) = conn.send(&message.to_string()).await {
                debug!("Private message to {} failed: {}", target_name, e);
            }
        }
        self.reply(id, &ServerMessage::Sent).await;

        debug!("{} -> {}: {}", sender, target_name, body);
        self.log
            .record(ActivityEvent::Pm {
                from: &sender,
                to: &target_name,
                body,
            })
            .await;
    }

    /// Handle `/list`
    async fn handle_list(&mut self, id: ConnectionId) {
        let names = self.registry.iter().map(|c| c.name().to_string()).collect();
        self.reply(id, &ServerMessage::Roster { names }).await;
    }

    /// Handle `/quit`
    async fn handle_quit(&mut self, id: ConnectionId) {
        let Some(index) = self.registry.find_by_handle(id) else {
            return;
        };
        let name = self.name_at(index);

        self.registry
            .broadcast(&ServerMessage::Left { name: name.clone() }.to_string(), Some(id))
            .await;
        info!("{} left the chat", name);
        self.log.record(ActivityEvent::Quit { name: &name }).await;

        // Fanout never removes entries, so `index` is still this connection
        self.registry.remove(index);
    }

    /// Handle a plain chat line
    async fn handle_broadcast(&mut self, id: ConnectionId, body: &str) {
        let Some(index) = self.registry.find_by_handle(id) else {
            return;
        };
        let name = self.name_at(index);

        let message = ServerMessage::Chat {
            from: name.clone(),
            body: body.to_string(),
        };
        self.registry.broadcast(&message.to_string(), None).await;

        debug!("{}: {}", name, body);
        self.log.record(ActivityEvent::Msg { name: &name, body }).await;
    }

    /// Helper: Send a message to one connection, ignoring failures
    async fn reply(&mut self, id: ConnectionId, message: &ServerMessage) {
        if let Err(e) = self.registry.send_to(id, &message.to_string()).await {
            debug!("Reply to {} failed: {}", id, e);
        }
    }

    /// Helper: Report a user-input error to its originator only
    async fn reply_error(&mut self, id: ConnectionId, err: CommandError) {
        self.reply(id, &err.into()).await;
    }

    fn name_at(&self, index: usize) -> String {
        self.registry
            .get(index)
            .map(|c| c.name().to_string())
            .unwrap_or_default()
    }
}
