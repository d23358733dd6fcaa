/*!
 * Status Feed
 * In-process broadcast of status lines plus a TCP line stream for viewers
 */

use super::message::StatusLine;
use super::traits::StatusSink;
use crate::core::errors::SonifierError;
use crate::core::limits::STATUS_CHANNEL_CAPACITY;
use crate::core::shutdown::ShutdownListener;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Fan-out of status lines to any number of subscribers
///
/// Publishing never blocks; slow subscribers lag and skip lines.
#[derive(Debug, Clone)]
pub struct StatusBroadcaster {
    tx: broadcast::Sender<Arc<str>>,
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        Self::with_capacity(STATUS_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for StatusBroadcaster {
    fn publish(&self, line: &StatusLine) {
        // No subscribers is fine
        let _ = self.tx.send(Arc::from(line.to_string()));
    }
}

/// Bind the status feed listener
pub async fn bind_status_feed(addr: SocketAddr) -> Result<TcpListener, SonifierError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "status feed listening");
    Ok(listener)
}

/// Stream status lines to every connected client until shutdown
pub async fn serve_status_feed(
    listener: TcpListener,
    broadcaster: StatusBroadcaster,
    mut shutdown: ShutdownListener,
) {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!(peer = %peer, "status viewer connected");
                        let rx = broadcaster.subscribe();
                        tokio::spawn(stream_lines(stream, peer, rx, shutdown.clone()));
                    }
                    Err(e) => warn!(error = %e, "status feed accept failed"),
                }
            }
            _ = shutdown.wait() => {
                info!("status feed shutting down");
                break;
            }
        }
    }
}

async fn stream_lines(
    mut stream: TcpStream,
    peer: SocketAddr,
    mut rx: broadcast::Receiver<Arc<str>>,
    mut shutdown: ShutdownListener,
) {
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(line) => {
                    let write = async {
                        stream.write_all(line.as_bytes()).await?;
                        stream.write_all(b"\n").await
                    };
                    if let Err(e) = write.await {
                        debug!(peer = %peer, error = %e, "status viewer write failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(peer = %peer, skipped, "status viewer lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = shutdown.wait() => break,
        }
    }
    info!(peer = %peer, "status viewer disconnected");
}
