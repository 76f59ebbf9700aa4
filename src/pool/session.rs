// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/session.rs
// Version: 1.3.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the per-connection Stratum session, located in the pool
// subdirectory. The session reads miner requests line by line, walks the
// subscribe -> authorize -> extranonce.subscribe handshake, validates shares
// against the job registry, and hands work issuance over to a JobScheduler.
//
// Tree Location:
// - src/pool/session.rs (protocol state machine)
// - Depends on: tokio, tokio-util, crate::core, crate::pool

use crate::core::config::ReconnectDirective;
use crate::core::personality::Personality;
use crate::pool::connection::{Outbound, spawn_writer};
use crate::pool::error::StratumErrorCode;
use crate::pool::messages::{ClientMessage, SubmitRequest, parse_client_message};
use crate::pool::protocol::StratumProtocol;
use crate::pool::registry::JobRegistry;
use crate::pool::scheduler::{ExtranonceState, JobScheduler, SchedulerExit};
use crate::utils::format::FormatUtils;
use futures::StreamExt;
use log::{debug, info, warn};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "sv1_mock_pool::pool::session";

/// Delay between the authorize ack and the initial mining.set_difficulty
pub const AUTHORIZE_DIFFICULTY_DELAY: Duration = Duration::from_millis(100);

/// Longest inbound line accepted, terminator excluded
pub const MAX_FRAME_LENGTH: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Subscribed,
    Authorized,
    Mining,
    Reconnecting,
    Closed,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The miner closed its side of the connection
    ClientDisconnected,
    /// The miner sent client.reconnect
    ClientReconnect,
    /// The scheduler sent the reconnect directive and the grace period ran out
    SchedulerReconnect,
    /// Reading from the socket failed or the bytes were not UTF-8
    ReadError,
    /// A line grew past MAX_FRAME_LENGTH without a terminator
    OversizedFrame,
    /// The writer task could not deliver a frame
    WriteFailed,
}

pub struct Session {
    ordinal: u64,
    peer: String,
    personality: Personality,
    state: SessionState,
    worker: Option<String>,
    extranonce: Option<ExtranonceState>,
    registry: Arc<JobRegistry>,
    directive: ReconnectDirective,
    outbound: Option<Outbound>,
    writer: Option<JoinHandle<()>>,
    scheduler: Option<JoinHandle<SchedulerExit>>,
    closing: CancellationToken,
}

impl Session {
    /// Create a session and start its writer task on `writer`
    pub fn new<W>(ordinal: u64, peer: String, personality: Personality, directive: ReconnectDirective, writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let closing = CancellationToken::new();
        let (outbound, writer) = spawn_writer(writer, peer.clone(), closing.clone());
        let extranonce = ExtranonceState {
            extranonce1: personality.extranonce1.clone(),
            extranonce2_size: personality.extranonce2_size,
        };

        Self {
            ordinal,
            peer,
            personality,
            state: SessionState::Connected,
            worker: None,
            extranonce: Some(extranonce),
            registry: Arc::new(JobRegistry::new()),
            directive,
            outbound: Some(outbound),
            writer: Some(writer),
            scheduler: None,
            closing,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Serve the connection until it ends, then tear everything down
    pub async fn run<R>(mut self, reader: R) -> CloseReason
    where
        R: AsyncRead + Unpin,
    {
        let reason = self.serve(reader).await;
        self.close().await;
        info!(target: LOG_TARGET, "Session {} closed: {:?}", self.ordinal, reason);
        reason
    }

    async fn serve<R>(&mut self, reader: R) -> CloseReason
    where
        R: AsyncRead + Unpin,
    {
        let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_FRAME_LENGTH));

        loop {
            let next = tokio::select! {
                biased;
                _ = self.closing.cancelled() => None,
                next = lines.next() => Some(next),
            };
            let Some(next) = next else {
                return self.cancelled_reason().await;
            };

            match next {
                None => {
                    info!(target: LOG_TARGET, "Client {} disconnected", self.peer);
                    return CloseReason::ClientDisconnected;
                }
                Some(Ok(line)) => {
                    if let Some(reason) = self.handle_line(&line).await {
                        return reason;
                    }
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    warn!(target: LOG_TARGET,
                        "Frame from {} exceeds {} bytes, closing",
                        self.peer, MAX_FRAME_LENGTH
                    );
                    return CloseReason::OversizedFrame;
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    warn!(target: LOG_TARGET, "Receive Error from {}: {}", self.peer, e);
                    return CloseReason::ReadError;
                }
            }
        }
    }

    /// The token fired while reading: either the scheduler finished its
    /// reconnect directive or the writer failed.
    async fn cancelled_reason(&mut self) -> CloseReason {
        match self.join_scheduler().await {
            Some(SchedulerExit::Reconnected) => {
                self.state = SessionState::Reconnecting;
                CloseReason::SchedulerReconnect
            }
            _ => CloseReason::WriteFailed,
        }
    }

    async fn handle_line(&mut self, line: &str) -> Option<CloseReason> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        info!(target: LOG_TARGET, "<<< Received: {}", line);
        match parse_client_message(line) {
            Ok(message) => self.dispatch(message).await,
            Err(e) => {
                warn!(target: LOG_TARGET, "<<< Raw data: {}", line);
                warn!(target: LOG_TARGET, "Invalid JSON: {}", e);
                None
            }
        }
    }

    async fn dispatch(&mut self, message: ClientMessage) -> Option<CloseReason> {
        match message {
            ClientMessage::Configure { id, extensions } => {
                let mask = self.personality.version_mask_hex();
                self.send(StratumProtocol::create_configure_response(&id, &extensions, &mask))
                    .await;
            }
            ClientMessage::Subscribe { id, user_agent } => self.handle_subscribe(id, user_agent).await,
            ClientMessage::Authorize { id, worker } => self.handle_authorize(id, worker).await,
            ClientMessage::ExtranonceSubscribe { id } => self.handle_extranonce_subscribe(id).await,
            ClientMessage::SuggestDifficulty { difficulty } => {
                debug!(target: LOG_TARGET, "Client suggested difficulty {:?}", difficulty);
            }
            ClientMessage::Submit(request) => self.handle_submit(request).await,
            ClientMessage::Reconnect { id, target } => {
                info!(target: LOG_TARGET, "Client requested reconnect: {:?}", target);
                if !id.is_null() {
                    self.send(StratumProtocol::create_result_response(&id, json!(true)))
                        .await;
                }
                self.state = SessionState::Reconnecting;
                return Some(CloseReason::ClientReconnect);
            }
            ClientMessage::Unhandled { method, .. } => {
                warn!(target: LOG_TARGET, "Unhandled method: {}", method.as_deref().unwrap_or("<none>"));
            }
        }
        None
    }

    async fn handle_subscribe(&mut self, id: Value, user_agent: Option<String>) {
        if self.state != SessionState::Connected {
            self.send(StratumProtocol::create_error_response(&id, StratumErrorCode::AlreadySubscribed))
                .await;
            return;
        }
        let Some(extranonce) = self.extranonce.as_ref() else {
            return;
        };

        info!(target: LOG_TARGET,
            "⛏️ Subscribe from {} ({})",
            self.peer,
            user_agent.as_deref().unwrap_or("unknown agent")
        );
        let frame = StratumProtocol::create_subscribe_response(
            &id,
            &FormatUtils::format_difficulty(self.personality.base_difficulty),
            &format!("sub-{:04x}", self.ordinal),
            &extranonce.extranonce1,
            extranonce.extranonce2_size,
        );
        self.send(frame).await;
        self.state = SessionState::Subscribed;
    }

    async fn handle_authorize(&mut self, id: Value, worker: Option<String>) {
        match self.state {
            SessionState::Connected => {
                self.send(StratumProtocol::create_error_response(&id, StratumErrorCode::NotSubscribed))
                    .await;
            }
            SessionState::Subscribed => {
                info!(target: LOG_TARGET, "🔑 Authorized worker {}", worker.as_deref().unwrap_or("<anonymous>"));
                self.worker = worker;
                self.send(StratumProtocol::create_result_response(&id, json!(true)))
                    .await;
                self.state = SessionState::Authorized;

                tokio::select! {
                    biased;
                    _ = self.closing.cancelled() => return,
                    _ = tokio::time::sleep(AUTHORIZE_DIFFICULTY_DELAY) => {}
                }
                self.send(StratumProtocol::create_set_difficulty(self.personality.base_difficulty))
                    .await;
            }
            _ => {
                debug!(target: LOG_TARGET, "Repeated authorize from {}", self.peer);
                self.send(StratumProtocol::create_result_response(&id, json!(true)))
                    .await;
            }
        }
    }

    async fn handle_extranonce_subscribe(&mut self, id: Value) {
        match self.state {
            SessionState::Connected | SessionState::Subscribed => {
                self.send(StratumProtocol::create_error_response(&id, StratumErrorCode::UnauthorizedWorker))
                    .await;
            }
            SessionState::Authorized => {
                self.send(StratumProtocol::create_result_response(&id, json!(true)))
                    .await;
                self.state = SessionState::Mining;
                self.start_scheduler();
            }
            _ => {
                self.send(StratumProtocol::create_result_response(&id, json!(true)))
                    .await;
            }
        }
    }

    fn start_scheduler(&mut self) {
        let Some(outbound) = self.outbound.clone() else {
            return;
        };
        let Some(extranonce) = self.extranonce.take() else {
            return;
        };
        info!(target: LOG_TARGET,
            "🚀 Starting {} job feed for session {} every {}",
            self.personality.name,
            self.ordinal,
            FormatUtils::format_duration(self.personality.job_interval)
        );
        let scheduler = JobScheduler::new(
            self.ordinal,
            self.personality.clone(),
            extranonce,
            Arc::clone(&self.registry),
            outbound,
            self.directive.clone(),
            self.closing.clone(),
        );
        self.scheduler = Some(scheduler.spawn());
    }

    async fn handle_submit(&mut self, request: SubmitRequest) {
        let Some(job_id) = request.job_id.as_deref() else {
            warn!(target: LOG_TARGET, "Invalid submit format: {:?}", request.params);
            self.send(StratumProtocol::create_error_response(&request.id, StratumErrorCode::InvalidSubmitFormat))
                .await;
            return;
        };

        let frame = if self.registry.contains(job_id) {
            info!(target: LOG_TARGET,
                "✅ Share accepted for job {} from {}",
                job_id,
                request.worker.as_deref().or(self.worker.as_deref()).unwrap_or("<anonymous>")
            );
            StratumProtocol::create_result_response(&request.id, json!(true))
        } else {
            warn!(target: LOG_TARGET, "❌ Share rejected: unknown job {}", job_id);
            StratumProtocol::create_error_response(&request.id, StratumErrorCode::UnknownJob)
        };
        self.send(frame).await;
    }

    async fn send(&self, frame: Value) {
        let Some(outbound) = self.outbound.as_ref() else {
            return;
        };
        if let Err(e) = outbound.send(frame).await {
            debug!(target: LOG_TARGET, "Dropping frame for {}: {}", self.peer, e);
        }
    }

    async fn join_scheduler(&mut self) -> Option<SchedulerExit> {
        let handle = self.scheduler.take()?;
        match handle.await {
            Ok(exit) => Some(exit),
            Err(e) => {
                warn!(target: LOG_TARGET, "Job scheduler for session {} failed: {}", self.ordinal, e);
                None
            }
        }
    }

    /// Cancel the scheduler, wait for it, then drain the writer.
    async fn close(&mut self) {
        self.closing.cancel();
        self.join_scheduler().await;

        self.outbound = None;
        if let Some(mut writer) = self.writer.take() {
            if tokio::time::timeout(self.directive.grace, &mut writer).await.is_err() {
                warn!(target: LOG_TARGET, "Writer for session {} did not drain in time", self.ordinal);
                writer.abort();
            }
        }
        self.state = SessionState::Closed;
    }
}


// Changelog:
// - v1.3.0 (2026-10-16): Line framing via FramedRead and LinesCodec.
//   - Lines longer than MAX_FRAME_LENGTH end the session with OversizedFrame.
//   - Invalid UTF-8 ends the session with ReadError.
//   - Scheduler reconnect sets Reconnecting; teardown always ends in Closed.
//   - Outbound sends wait on the bounded writer queue.
// - v1.2.0 (2026-10-16): Out-of-state requests answered with error codes.
//   - authorize before subscribe -> 25, extranonce.subscribe before authorize -> 24.
//   - Teardown awaits the scheduler before draining the writer.
// - v1.1.0 (2026-10-15): Reader accepts raw bytes so invalid UTF-8 is skipped.
// - v1.0.0 (2026-10-14): Initial session state machine.
