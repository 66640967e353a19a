//! Interactive chat client
//!
//! Two flows share one connection: server bytes are copied to the
//! terminal, terminal lines are forwarded to the server. The session ends
//! as soon as either flow ends.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::ClientError;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection
    ServerClosed,
    /// The user sent `/quit`
    Quit,
    /// Local input reached end-of-stream
    InputClosed,
}

/// Connect to a chat server
pub async fn connect(host: &str, port: u16) -> Result<TcpStream, ClientError> {
    TcpStream::connect((host, port))
        .await
        .map_err(|source| ClientError::Connect {
            addr: format!("{host}:{port}"),
            source,
        })
}

/// Relay between `stream` and the local `input`/`output`
pub async fn run_session<S, I, O>(
    stream: S,
    input: I,
    output: O,
) -> Result<SessionEnd, ClientError>
where
    S: AsyncRead + AsyncWrite,
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (server_rx, server_tx) = tokio::io::split(stream);

    tokio::select! {
        end = receive(server_rx, output) => end,
        end = transmit(input, server_tx) => end,
    }
}

/// Server → terminal
async fn receive<R, O>(mut server: R, mut output: O) -> Result<SessionEnd, ClientError>
where
    R: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; 4096];
    loop {
        let n = server.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        output.write_all(&buf[..n]).await?;
        output.flush().await?;
    }
    output.write_all(b"Disconnected from server.\n").await?;
    output.flush().await?;
    Ok(SessionEnd::ServerClosed)
}

/// Terminal → server
///
/// Lines are forwarded byte-for-byte; the server decodes them.
async fn transmit<I, W>(input: I, mut server: W) -> Result<SessionEnd, ClientError>
where
    I: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut input = BufReader::new(input);
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line).await? == 0 {
            return Ok(SessionEnd::InputClosed);
        }
        if !line.ends_with(b"\n") {
            line.push(b'\n');
        }
        server.write_all(&line).await?;
        server.flush().await?;
        if line.starts_with(b"/quit") {
            debug!("Quit requested");
            return Ok(SessionEnd::Quit);
        }
    }
}
