//! Line-oriented TCP client for the command protocol.
//!
//! Works against the emulator and against real hardware alike. Commands are sent
//! with a `\n` terminator; only queries (first token ending in `?`) wait for a
//! reply line.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Default reply timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Delay between connection attempts
const CONNECT_RETRY: Duration = Duration::from_secs(1);

/// Prompt shown by the interactive console.
pub const PROMPT: &str = "Siglent> ";

pub struct ScpiClient {
    stream: Mutex<BufReader<TcpStream>>,
    timeout: Duration,
}

impl ScpiClient {
    /// Connect to `addr` (`host:port`), retrying until the peer accepts.
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = loop {
            match TcpStream::connect(addr).await {
                Ok(stream) => break stream,
                Err(e) => {
                    warn!(%addr, error = %e, "Connection failed, retrying");
                    sleep(CONNECT_RETRY).await;
                }
            }
        };
        Self::from_stream(stream, addr)
    }

    /// Connect once, failing instead of retrying.
    pub async fn connect_once(addr: &str) -> Result<Self> {
        let stream = timeout(Duration::from_secs(5), TcpStream::connect(addr))
            .await
            .with_context(|| format!("Connection timeout to {}", addr))?
            .with_context(|| format!("Failed to connect to {}", addr))?;
        Self::from_stream(stream, addr)
    }

    fn from_stream(stream: TcpStream, addr: &str) -> Result<Self> {
        stream.set_nodelay(true)?;
        info!(%addr, "Connected");
        Ok(Self {
            stream: Mutex::new(BufReader::new(stream)),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        })
    }

    /// Send a command without waiting for a reply.
    pub async fn write(&self, command: &str) -> Result<()> {
        let mut stream = self.stream.lock().await;
        Self::write_line(&mut stream, command).await
    }

    /// Send a query and return the reply line with its terminator removed.
    pub async fn query(&self, query: &str) -> Result<String> {
        Ok(self.query_raw(query).await?.trim_end().to_string())
    }

    /// Send a query and return the reply line exactly as received.
    pub async fn query_raw(&self, query: &str) -> Result<String> {
        let mut stream = self.stream.lock().await;
        Self::write_line(&mut stream, query).await?;

        let mut response = String::new();
        match timeout(self.timeout, stream.read_line(&mut response)).await {
            Ok(Ok(0)) => anyhow::bail!("Connection closed by peer"),
            Ok(Ok(_)) => {
                debug!(response = ?response, "Reply");
                Ok(response)
            }
            Ok(Err(e)) => Err(e).context("Failed to read response"),
            Err(_) => anyhow::bail!("Timeout waiting for response to: {}", query),
        }
    }

    /// Send a command, reading a reply only when it is a query.
    pub async fn send(&self, command: &str) -> Result<Option<String>> {
        if is_query(command) {
            self.query_raw(command).await.map(Some)
        } else {
            self.write(command).await.map(|_| None)
        }
    }

    async fn write_line(stream: &mut BufReader<TcpStream>, command: &str) -> Result<()> {
        debug!(command, "Send");
        let line = format!("{}\n", command);
        stream
            .get_mut()
            .write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write command: {}", command))?;
        stream
            .get_mut()
            .flush()
            .await
            .context("Failed to flush stream")
    }
}

/// A command is a query when its first token ends in `?`.
pub fn is_query(command: &str) -> bool {
    command
        .split(' ')
        .next()
        .is_some_and(|verb| verb.ends_with('?'))
}

/// Interactive console: read commands from stdin and print query replies.
///
/// Input is upper-cased, blank lines are skipped and `EXIT` ends the session.
pub async fn interactive(client: &ScpiClient) -> Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = stdin.next_line().await? else {
            return Ok(());
        };
        let command = line.trim().to_ascii_uppercase();
        if command.is_empty() {
            continue;
        }
        if command == "EXIT" {
            return Ok(());
        }

        if let Some(reply) = client.send(&command).await? {
            stdout.write_all(reply.as_bytes()).await?;
            if !reply.ends_with('\n') {
                stdout.write_all(b"\n").await?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_are_detected_by_first_token() {
        assert!(is_query("*IDN?"));
        assert!(is_query("C1:BSWV?"));
        assert!(is_query("STL? BUILDIN"));
        assert!(!is_query("C1:OUTP ON"));
        assert!(!is_query("PACP C2,C1"));
        assert!(!is_query(""));
    }
}
