//! Administrative console commands
//!
//! Operator commands read from the server's stdin. Everything except
//! `shutdown` is read-only inspection.

use crate::room::Room;

/// Default number of lines shown by `logs`
pub const DEFAULT_LOG_LINES: usize = 20;

/// One parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// `clients`
    Clients,
    /// `logs [N]`
    Logs(usize),
    /// `shutdown`
    Shutdown,
    /// Anything else
    Unknown(String),
}

/// Result of running an admin command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminReply {
    /// Print this text and keep serving
    Output(String),
    /// Print this text and stop the server
    Shutdown(String),
}

impl AdminCommand {
    /// Parse a console line; trailing CR/LF are ignored
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        match line {
            "clients" => AdminCommand::Clients,
            "shutdown" => AdminCommand::Shutdown,
            "logs" => AdminCommand::Logs(DEFAULT_LOG_LINES),
            _ => match line.strip_prefix("logs ") {
                Some(n) => AdminCommand::Logs(n.trim().parse().unwrap_or(DEFAULT_LOG_LINES)),
                None => AdminCommand::Unknown(line.to_string()),
            },
        }
    }

    /// Run the command against the current room state
    pub async fn execute(&self, room: &Room) -> AdminReply {
        match self {
            AdminCommand::Clients => {
                let registry = room.registry();
                let mut out = format!("Connected clients ({}):\n", registry.len());
                for conn in registry.iter() {
                    out.push_str(&format!(" - {} (id={})\n", conn.name(), conn.id));
                }
                AdminReply::Output(out)
            }
            AdminCommand::Logs(n) => match room.log().tail(*n).await {
                Ok(lines) => {
                    let mut out = String::new();
                    for line in lines {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    AdminReply::Output(out)
                }
                Err(e) => AdminReply::Output(format!("{e}\n")),
            },
            AdminCommand::Shutdown => AdminReply::Shutdown("Shutting down server...\n".to_string()),
            AdminCommand::Unknown(_) => AdminReply::Output(
                "Unknown admin command. Available: clients, logs [N], shutdown\n".to_string(),
            ),
        }
    }
}
