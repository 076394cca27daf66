// SPDX-FileCopyrightText: 2026 sqlbridge contributors
// SPDX-License-Identifier: MIT

//! Daemon server implementation.
//!
//! Clients connect over a Unix socket and exchange newline-delimited JSON:
//! one request per line, answered by one reply line in the same order.
//! Requests of one connection run one after another; separate connections
//! run in parallel on the blocking thread pool.

use std::fmt::Debug;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, trace};

use sqlbridge_db::ErrorEnvelope;

use crate::handler::Handler;
use crate::protocol::Reply;
use crate::request::Request;

/// Serve requests from `reader` until it reaches end of input.
pub async fn serve_connection<R, W>(
    handler: Handler,
    reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncRead + Debug + Send + Unpin,
    W: AsyncWrite + Debug + Send + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        trace!("request: {line}");
        let reply = process_line(&handler, &line).await;
        writer.write_all(&reply.to_line()?).await?;
        writer.flush().await?;
    }
    debug!("Connection closed by peer");
    Ok(())
}

async fn process_line(handler: &Handler, line: &str) -> Reply {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected request: {e}");
            return Reply::failure(e);
        }
    };

    let handler = handler.clone();
    match tokio::task::spawn_blocking(move || handler.handle(request)).await {
        Ok(result) => {
            if let Err(e) = &result {
                debug!("Request failed: {e}");
            }
            Reply::from(result)
        }
        Err(e) => {
            error!("Request task failed: {e}");
            Reply::Error(ErrorEnvelope::new(
                "internal_error",
                format!("Task join error: {e}"),
            ))
        }
    }
}

pub struct DaemonServer {
    handler: Handler,
    socket_path: PathBuf,
}

impl DaemonServer {
    pub fn new(handler: Handler, socket_path: PathBuf) -> Self {
        Self {
            handler,
            socket_path,
        }
    }

    pub async fn serve(&self) -> Result<(), std::io::Error> {
        // Remove existing socket file if present
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path)?;
        }

        // Create parent directory if needed
        if let Some(parent) = self.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("Listening on {:?}", self.socket_path);

        loop {
            let (stream, _addr) = listener.accept().await?;
            let handler = self.handler.clone();

            tokio::spawn(async move {
                let (reader, writer) = stream.into_split();
                if let Err(e) = serve_connection(handler, reader, writer).await {
                    error!("Connection error: {:?}", e);
                }
            });
        }
    }
}
