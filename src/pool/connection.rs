// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/connection.rs
// Version: 1.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file owns the write side of a miner connection, located in the pool
// subdirectory. The read loop and the job scheduler both hand frames to an
// Outbound handle; a single writer task puts them on the socket in order, so
// frames are never interleaved.
//
// Tree Location:
// - src/pool/connection.rs (outbound frame writer)
// - Depends on: tokio, tokio-util, crate::pool::protocol

use crate::pool::error::PoolError;
use crate::pool::protocol::StratumProtocol;
use log::{error, info};
use serde_json::Value;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "sv1_mock_pool::pool::connection";

/// Frames queued ahead of the socket before senders wait
pub const OUTBOUND_QUEUE_DEPTH: usize = 64;

/// Cloneable handle for queueing outbound frames
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: mpsc::Sender<String>,
    closing: CancellationToken,
}

impl Outbound {
    /// Queue a frame for the writer task.
    ///
    /// Waits while the queue is full. Gives up with `SessionClosing` once
    /// the session starts tearing down.
    pub async fn send(&self, frame: Value) -> Result<(), PoolError> {
        let message = StratumProtocol::to_message(frame);
        if message.is_empty() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.closing.cancelled() => Err(PoolError::SessionClosing),
            sent = self.tx.send(message) => sent.map_err(|_| PoolError::ChannelClosed),
        }
    }
}

/// Start the writer task for one connection.
///
/// The task exits once every Outbound clone is dropped and the queue is
/// drained, shutting down the write half. A write failure cancels `closing`
/// so the rest of the session tears down.
pub fn spawn_writer<W>(writer: W, peer: String, closing: CancellationToken) -> (Outbound, JoinHandle<()>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_DEPTH);
    let handle = tokio::spawn(write_frames(writer, rx, peer, closing.clone()));
    (Outbound { tx, closing }, handle)
}

async fn write_frames<W>(mut writer: W, mut rx: mpsc::Receiver<String>, peer: String, closing: CancellationToken)
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let written = async {
            writer.write_all(message.as_bytes()).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = written {
            error!(target: LOG_TARGET, "Send Error to {}: {}", peer, e);
            closing.cancel();
            return;
        }
        info!(target: LOG_TARGET, ">>> Sent: {}", message.trim_end());
    }

    let _ = writer.shutdown().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_frames_written_in_order_then_shutdown() {
        let (client, server) = tokio::io::duplex(4096);
        let closing = CancellationToken::new();
        let (outbound, handle) = spawn_writer(server, "test".to_string(), closing.clone());

        let other = outbound.clone();
        outbound.send(json!({"id": 1, "result": true, "error": null})).await.unwrap();
        other
            .send(json!({"id": null, "method": "mining.set_difficulty", "params": [300]}))
            .await
            .unwrap();
        drop(outbound);
        drop(other);
        handle.await.unwrap();

        let mut client = client;
        let mut text = String::new();
        client.read_to_string(&mut text).await.unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"result\":true"));
        assert!(lines[1].contains("mining.set_difficulty"));
        assert!(!closing.is_cancelled());
    }

    #[tokio::test]
    async fn test_write_failure_cancels_session() {
        let (client, server) = tokio::io::duplex(64);
        drop(client);
        let closing = CancellationToken::new();
        let (outbound, handle) = spawn_writer(server, "test".to_string(), closing.clone());

        outbound.send(json!({"id": 1, "result": true, "error": null})).await.unwrap();
        handle.await.unwrap();
        assert!(closing.is_cancelled());
        assert!(outbound.send(json!({"id": 2, "result": true, "error": null})).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_is_bounded_when_miner_stops_reading() {
        // 16 bytes of pipe: the writer blocks inside the first frame
        let (_client, server) = tokio::io::duplex(16);
        let closing = CancellationToken::new();
        let (outbound, _handle) = spawn_writer(server, "test".to_string(), closing.clone());
        let frame = json!({"id": 1, "result": true, "error": null});

        for _ in 0..=OUTBOUND_QUEUE_DEPTH {
            outbound.send(frame.clone()).await.unwrap();
        }
        let blocked = tokio::time::timeout(Duration::from_secs(5), outbound.send(frame.clone())).await;
        assert!(blocked.is_err(), "send should wait once the queue is full");

        closing.cancel();
        assert!(matches!(outbound.send(frame).await, Err(PoolError::SessionClosing)));
    }
}

// Changelog:
// - v1.1.0 (2026-10-16): Bounded the outbound queue.
//   - Senders wait for room instead of growing memory without limit.
//   - A pending send gives up when the session is cancelled.
// - v1.0.0 (2026-10-14): Single writer task per connection.
