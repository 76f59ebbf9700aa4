// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/listener.rs
// Version: 2.1.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the TCP listener of the mock pool, located in the pool
// subdirectory. It accepts miner connections, numbers them, picks a
// personality for each and spawns a Session.
//
// Tree Location:
// - src/pool/listener.rs (pool TCP listener)
// - Depends on: tokio, crate::core, crate::pool::session

use crate::core::config::{PoolConfig, ReconnectDirective};
use crate::core::personality::PersonalitySelector;
use crate::pool::error::PoolError;
use crate::pool::session::{CloseReason, Session};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::{TcpListener, lookup_host};
use tokio::task::JoinHandle;

const LOG_TARGET: &str = "sv1_mock_pool::pool::listener";

/// Sleep after the first failed accept; doubles per consecutive failure
pub const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(50);
pub const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(2);

/// Backoff after `consecutive_failures` accept errors in a row (at least one)
fn accept_backoff(consecutive_failures: u32) -> Duration {
    let shift = consecutive_failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE.saturating_mul(1 << shift).min(ACCEPT_BACKOFF_MAX)
}

pub struct PoolListener {
    listener: TcpListener,
    ordinals: AtomicU64,
    selector: Arc<dyn PersonalitySelector>,
    directive: ReconnectDirective,
}

impl PoolListener {
    /// Bind to the configured address
    pub async fn bind(config: &PoolConfig, selector: Arc<dyn PersonalitySelector>) -> Result<Self, PoolError> {
        let address = config.bind_address();
        let resolved = Self::resolve_bind_address(&address).await?;
        let listener = TcpListener::bind(resolved)
            .await
            .map_err(|source| PoolError::Bind { address, source })?;

        Ok(Self {
            listener,
            ordinals: AtomicU64::new(0),
            selector,
            directive: config.directive.clone(),
        })
    }

    /// Resolve a bind address from either IP:port or host:port format
    async fn resolve_bind_address(address: &str) -> Result<SocketAddr, PoolError> {
        if let Ok(addr) = address.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let mut addrs = lookup_host(address).await?;
        addrs.next().ok_or_else(|| PoolError::AddressNotFound {
            address: address.to_string(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, PoolError> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of connections accepted so far
    pub fn sessions_started(&self) -> u64 {
        self.ordinals.load(Ordering::SeqCst)
    }

    fn next_ordinal(&self) -> u64 {
        self.ordinals.fetch_add(1, Ordering::SeqCst)
    }

    /// Accept one connection and spawn its session
    pub async fn accept_one(&self) -> Result<JoinHandle<CloseReason>, PoolError> {
        let (stream, peer) = self.listener.accept().await?;
        stream.set_nodelay(true)?;

        let ordinal = self.next_ordinal();
        let personality = self.selector.select(ordinal);
        info!(target: LOG_TARGET,
            "🔌 New connection from {} (session {}, personality {})",
            peer, ordinal, personality.name
        );

        let (reader, writer) = stream.into_split();
        let session = Session::new(ordinal, peer.to_string(), personality, self.directive.clone(), writer);
        Ok(tokio::spawn(session.run(reader)))
    }

    /// Accept connections until the process exits.
    ///
    /// Persistent accept errors (e.g. EMFILE) back off instead of spinning.
    pub async fn run(&self) {
        let mut failures: u32 = 0;
        loop {
            match self.accept_one().await {
                Ok(_) => failures = 0,
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let backoff = accept_backoff(failures);
                    error!(target: LOG_TARGET, "Accept failed: {} (retrying in {:?})", e, backoff);
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}


// Changelog:
// - v2.1.0 (2026-10-16): Accept errors back off exponentially up to 2s.
// - v2.0.0 (2026-10-16): Replaced the outbound pool client with a listener.
//   - Address resolution kept (IP:port or host:port) for the bind address.
//   - TCP_NODELAY is set on every accepted socket.
// - v1.1.0 (2025-06-23): Added DNS resolution support.
