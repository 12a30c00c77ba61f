use std::future::Future;
use std::io;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use shoji_ipc::{Command, Response};

pub type CommandSender = mpsc::Sender<(Command, mpsc::Sender<Response>)>;

/// Consecutive accept errors tolerated before the server gives up.
const MAX_ACCEPT_FAILURES: u32 = 5;
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Source of client connections.
pub trait Listener {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    fn accept(&mut self) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

pub struct IpcServer {
    cmd_tx: CommandSender,
}

impl IpcServer {
    pub fn new(cmd_tx: CommandSender) -> Self {
        Self { cmd_tx }
    }

    /// Accepts clients until the listener fails `MAX_ACCEPT_FAILURES` times in a row.
    pub async fn serve<L: Listener>(&self, mut listener: L) -> Result<()> {
        let mut failures = 0;
        loop {
            match listener.accept().await {
                Ok(stream) => {
                    failures = 0;
                    let cmd_tx = self.cmd_tx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, cmd_tx).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_ACCEPT_FAILURES {
                        return Err(anyhow::Error::new(e).context("IPC server gave up accepting connections"));
                    }
                    tracing::error!("Accept error ({}/{}): {}", failures, MAX_ACCEPT_FAILURES, e);
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                }
            }
        }
    }

    pub async fn handle_connection<S>(stream: S, cmd_tx: CommandSender) -> Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            let n = reader.read_line(&mut line).await?;
            if n == 0 {
                break; // EOF
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<Command>(line) {
                Ok(cmd) => {
                    tracing::debug!("Received command: {:?}", cmd);
                    let (resp_tx, mut resp_rx) = mpsc::channel(1);

                    if cmd_tx.send((cmd, resp_tx)).await.is_err() {
                        Response::Error {
                            message: "Internal error: command channel closed".to_string(),
                        }
                    } else {
                        resp_rx.recv().await.unwrap_or(Response::Error {
                            message: "Internal error: no response".to_string(),
                        })
                    }
                }
                Err(e) => Response::Error {
                    message: format!("Invalid command: {}", e),
                },
            };

            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        Ok(())
    }
}

#[cfg(windows)]
pub use pipe::PipeListener;

#[cfg(windows)]
mod pipe {
    use std::io;

    use anyhow::{Context, Result};
    use tokio::net::windows::named_pipe::{NamedPipeServer, PipeMode, ServerOptions};

    use super::Listener;

    /// Named pipe endpoint. Always holds one instance waiting for the next client.
    pub struct PipeListener {
        name: String,
        next: NamedPipeServer,
    }

    impl PipeListener {
        /// Creates the first pipe instance. Must be called inside a tokio runtime.
        pub fn bind(name: &str) -> Result<Self> {
            let next = ServerOptions::new()
                .first_pipe_instance(true)
                .pipe_mode(PipeMode::Byte)
                .create(name)
                .with_context(|| format!("Failed to create pipe {} (is shoji already running?)", name))?;
            tracing::info!("IPC server listening on {}", name);
            Ok(Self {
                name: name.to_string(),
                next,
            })
        }
    }

    impl Listener for PipeListener {
        type Stream = NamedPipeServer;

        async fn accept(&mut self) -> io::Result<NamedPipeServer> {
            let connected = self.next.connect().await;
            // Replace the instance even on failure; a failed one is not reusable
            let fresh = ServerOptions::new().pipe_mode(PipeMode::Byte).create(&self.name)?;
            let used = std::mem::replace(&mut self.next, fresh);
            connected.map(|()| used)
        }
    }
}
