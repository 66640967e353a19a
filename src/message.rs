//! Line protocol definitions
//!
//! Client → server command lines are parsed into `Command`; server →
//! client text is rendered from `ServerMessage`. Every rendered message
//! ends with `\n`.

use std::borrow::Cow;
use std::fmt;

use crate::error::CommandError;
use crate::types::bounded_name;

/// Client → Server command, parsed from one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/nick <name>`
    Rename { name: String },
    /// `/msg <user> <text>`
    PrivateMessage { target: String, body: String },
    /// `/list`
    ListUsers,
    /// `/quit`
    Quit,
    /// Anything else
    Broadcast { body: String },
}

impl Command {
    /// Parse one line with its line terminator already stripped
    ///
    /// Prefix rules are tried in order; only a malformed `/msg` is an error.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        if let Some(name) = line.strip_prefix("/nick ") {
            return Ok(Command::Rename {
                name: bounded_name(name),
            });
        }

        if let Some(args) = line.strip_prefix("/msg ") {
            let args = args.trim_start_matches(' ');
            return match args.split_once(' ') {
                Some((target, body)) if !target.is_empty() && !body.is_empty() => {
                    Ok(Command::PrivateMessage {
                        target: target.to_string(),
                        body: body.to_string(),
                    })
                }
                _ => Err(CommandError::MsgUsage),
            };
        }

        match line {
            "/list" => Ok(Command::ListUsers),
            "/quit" => Ok(Command::Quit),
            _ => Ok(Command::Broadcast {
                body: line.to_string(),
            }),
        }
    }
}

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// Greeting sent to a new connection
    Welcome,
    /// Someone connected
    Joined { name: String },
    /// Someone closed their connection
    Disconnected { name: String },
    /// Someone sent `/quit`
    Left { name: String },
    /// Someone changed their name
    Renamed { old: String, new: String },
    /// Public chat line
    Chat { from: String, body: String },
    /// Private chat line, seen only by the target
    Private { from: String, body: String },
    /// Acknowledgement of a delivered private message
    Sent,
    /// Roster snapshot
    Roster { names: Vec<String> },
    /// Error reported to the originator
    Error(CommandError),
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Welcome => writeln!(f, "Welcome! Use /nick to set name."),
            ServerMessage::Joined { name } => writeln!(f, "{name} has joined the chat."),
            ServerMessage::Disconnected { name } => writeln!(f, "{name} has disconnected."),
            ServerMessage::Left { name } => writeln!(f, "{name} has left the chat."),
            ServerMessage::Renamed { old, new } => writeln!(f, "{old} is now known as {new}"),
            ServerMessage::Chat { from, body } => writeln!(f, "{from}: {body}"),
            ServerMessage::Private { from, body } => writeln!(f, "(private) {from}: {body}"),
            ServerMessage::Sent => writeln!(f, "(sent)"),
            ServerMessage::Roster { names } => {
                writeln!(f, "Connected users ({}):", names.len())?;
                for name in names {
                    writeln!(f, "{name}")?;
                }
                Ok(())
            }
            ServerMessage::Error(err) => writeln!(f, "{err}"),
        }
    }
}

/// Convert CommandError to ServerMessage for client notification
impl From<CommandError> for ServerMessage {
    fn from(err: CommandError) -> Self {
        ServerMessage::Error(err)
    }
}

/// Split one read buffer into command lines
///
/// Lines end at `\n` with an optional `\r` before it. A trailing fragment
/// without `\n` is yielded as-is; it is not joined with the next read.
/// Blank lines are skipped.
pub fn split_lines(chunk: &[u8]) -> Vec<Cow<'_, str>> {
    chunk
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(String::from_utf8_lossy)
        .collect()
}
