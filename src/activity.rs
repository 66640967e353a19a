//! Activity log sink
//!
//! Append-only text file with one record per line. The server keeps
//! running when the file cannot be opened or written.

use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::error::LogError;

/// One loggable event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent<'a> {
    Connect { name: &'a str, peer: SocketAddr },
    Disconnect { name: &'a str },
    Nick { old: &'a str, new: &'a str },
    Msg { name: &'a str, body: &'a str },
    Pm { from: &'a str, to: &'a str, body: &'a str },
    Quit { name: &'a str },
}

impl fmt::Display for ActivityEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityEvent::Connect { name, peer } => write!(f, "CONNECT {name} ({peer})"),
            ActivityEvent::Disconnect { name } => write!(f, "DISCONNECT {name}"),
            ActivityEvent::Nick { old, new } => write!(f, "NICK {old} -> {new}"),
            ActivityEvent::Msg { name, body } => write!(f, "MSG {name}: {body}"),
            ActivityEvent::Pm { from, to, body } => write!(f, "PM {from} -> {to}: {body}"),
            ActivityEvent::Quit { name } => write!(f, "QUIT {name}"),
        }
    }
}

#[derive(Debug)]
struct Sink {
    path: PathBuf,
    file: File,
}

/// Append-only activity recorder
#[derive(Debug, Default)]
pub struct ActivityLog {
    sink: Option<Sink>,
}

impl ActivityLog {
    /// Open `path` for appending, creating it if needed
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            sink: Some(Sink { path, file }),
        })
    }

    /// A log that records nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    /// Append one record and flush it
    ///
    /// The flush completes the write, so a following `tail` sees it.
    pub async fn record(&mut self, event: ActivityEvent<'_>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let line = format!("{event}\n");
        let written = match sink.file.write_all(line.as_bytes()).await {
            Ok(()) => sink.file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!("Failed to write activity log {}: {}", sink.path.display(), e);
        }
    }

    /// Last `n` records, oldest first
    pub async fn tail(&self, n: usize) -> Result<Vec<String>, LogError> {
        let sink = self.sink.as_ref().ok_or(LogError::Disabled)?;
        let contents = tokio::fs::read_to_string(&sink.path).await?;
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|l| l.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_format() {
        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();
        let cases = [
            (
                ActivityEvent::Connect { name: "User4", peer },
                "CONNECT User4 (127.0.0.1:5555)",
            ),
            (ActivityEvent::Disconnect { name: "bob" }, "DISCONNECT bob"),
            (
                ActivityEvent::Nick {
                    old: "User4",
                    new: "bob",
                },
                "NICK User4 -> bob",
            ),
            (
                ActivityEvent::Msg {
                    name: "bob",
                    body: "hi all",
                },
                "MSG bob: hi all",
            ),
            (
                ActivityEvent::Pm {
                    from: "bob",
                    to: "amy",
                    body: "psst",
                },
                "PM bob -> amy: psst",
            ),
            (ActivityEvent::Quit { name: "bob" }, "QUIT bob"),
        ];
        for (event, expected) in cases {
            assert_eq!(event.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn test_record_and_tail() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ActivityLog::open(dir.path().join("chat.log")).await.unwrap();

        for i in 0..5 {
            let body = format!("line {i}");
            log.record(ActivityEvent::Msg {
                name: "bob",
                body: &body,
            })
            .await;
        }

        let tail = log.tail(2).await.unwrap();
        assert_eq!(tail, vec!["MSG bob: line 3", "MSG bob: line 4"]);
        assert_eq!(log.tail(100).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_open_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.log");

        let mut first = ActivityLog::open(&path).await.unwrap();
        first.record(ActivityEvent::Quit { name: "a" }).await;
        drop(first);

        let mut second = ActivityLog::open(&path).await.unwrap();
        second.record(ActivityEvent::Quit { name: "b" }).await;

        assert_eq!(second.tail(20).await.unwrap(), vec!["QUIT a", "QUIT b"]);
    }

    #[tokio::test]
    async fn test_disabled_log() {
        let mut log = ActivityLog::disabled();
        log.record(ActivityEvent::Quit { name: "a" }).await;

        assert!(log.path().is_none());
        assert!(matches!(log.tail(20).await, Err(LogError::Disabled)));
    }
}
