//! TCP command server.
//!
//! Accepts any number of clients; each connection runs in its own task and feeds
//! framed command lines to one [`SharedEngine`]. Non-empty replies are written
//! back with exactly one trailing newline.

use crate::config::ServerConfig;
use crate::engine::SharedEngine;
use crate::error::{AppResult, EmulatorError};
use crate::network::framing::LineFramer;
use std::io::ErrorKind;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, info_span, warn, Instrument};

const READ_BUFFER_BYTES: usize = 2048;

pub struct EmulatorServer {
    listener: TcpListener,
    engine: SharedEngine,
    max_line_bytes: usize,
}

impl EmulatorServer {
    /// Bind the configured address, retrying until it succeeds.
    pub async fn bind(config: &ServerConfig, engine: SharedEngine) -> AppResult<Self> {
        let addr = config.socket_addr()?;
        let retry = Duration::from_millis(config.bind_retry_ms);

        let listener = loop {
            match TcpListener::bind(addr).await {
                Ok(listener) => break listener,
                Err(e) => {
                    error!(%addr, error = %e, "Failed to bind. Retrying...");
                    sleep(retry).await;
                }
            }
        };

        info!(addr = %listener.local_addr()?, model = %engine.model(), "Emulator listening");

        Ok(Self {
            listener,
            engine,
            max_line_bytes: config.max_line_bytes,
        })
    }

    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped.
    pub async fn run(self) -> AppResult<()> {
        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    info!(peer = %addr, "New connection");
                    let engine = self.engine.clone();
                    let max_line_bytes = self.max_line_bytes;
                    tokio::spawn(
                        async move {
                            if let Err(e) =
                                Self::handle_client(socket, engine, max_line_bytes).await
                            {
                                warn!(error = %e, "Client error");
                            }
                        }
                        .instrument(info_span!("connection", peer = %addr)),
                    );
                }
                Err(e) => error!(error = %e, "Accept error"),
            }
        }
    }

    /// Run the accept loop in a background task.
    pub fn spawn(self) -> JoinHandle<AppResult<()>> {
        tokio::spawn(self.run())
    }

    async fn handle_client(
        mut socket: TcpStream,
        engine: SharedEngine,
        max_line_bytes: usize,
    ) -> AppResult<()> {
        let mut framer = LineFramer::new(max_line_bytes);
        let mut buf = vec![0u8; READ_BUFFER_BYTES];

        loop {
            let n = match socket.read(&mut buf).await {
                Ok(0) => {
                    if let Some(command) = framer.finish() {
                        Self::respond(&mut socket, &engine, &command).await?;
                    }
                    info!("Client closed connection");
                    return Ok(());
                }
                Ok(n) => n,
                Err(e) if is_disconnect(&e) => {
                    info!("Client closed connection");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            for command in framer.push(&buf[..n]) {
                match Self::respond(&mut socket, &engine, &command).await {
                    Ok(()) => {}
                    Err(EmulatorError::Io(e)) if is_disconnect(&e) => {
                        info!("Client closed connection");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    async fn respond(socket: &mut TcpStream, engine: &SharedEngine, command: &str) -> AppResult<()> {
        let mut reply = engine.process(command);
        debug!(command, reply = %reply, "Command processed");
        if reply.is_empty() {
            return Ok(());
        }
        if !reply.ends_with('\n') {
            reply.push('\n');
        }
        socket.write_all(reply.as_bytes()).await?;
        Ok(())
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe
    )
}
