// SV1 Mock Pool - Free and Open Source Software Statement
//
// This project, sv1-mock-pool, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/pool/scheduler.rs
// Version: 1.2.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the per-session job scheduler, located in the pool
// subdirectory. Once a miner has subscribed to extranonce updates the
// scheduler hands out jobs on the personality's cadence, rotates extranonce1
// when the personality asks for it, and ends the session with a
// client.reconnect directive after a fixed number of jobs.
//
// Tree Location:
// - src/pool/scheduler.rs (job issuance and reconnect trigger)
// - Depends on: tokio, tokio-util, crate::core, crate::pool

use crate::core::config::ReconnectDirective;
use crate::core::job::{Job, format_job_id};
use crate::core::personality::{ExtranonceRotation, Personality};
use crate::pool::connection::Outbound;
use crate::pool::error::PoolError;
use crate::pool::protocol::StratumProtocol;
use crate::pool::registry::JobRegistry;
use crate::utils::format::FormatUtils;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "sv1_mock_pool::pool::scheduler";

/// Pause between the extranonce.subscribe ack and the first job
pub const FIRST_JOB_DELAY: Duration = Duration::from_millis(200);

/// Connection parameters the scheduler takes over from the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtranonceState {
    pub extranonce1: String,
    pub extranonce2_size: usize,
}

/// How the scheduler task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerExit {
    /// Session teardown cancelled the scheduler
    Cancelled,
    /// The reconnect directive was sent and the session was asked to close
    Reconnected,
    /// The writer went away underneath the scheduler
    WriterClosed,
}

pub struct JobScheduler {
    ordinal: u64,
    personality: Personality,
    extranonce: ExtranonceState,
    job_counter: u64,
    jobs_sent: u64,
    registry: Arc<JobRegistry>,
    outbound: Outbound,
    directive: ReconnectDirective,
    closing: CancellationToken,
}

impl JobScheduler {
    pub fn new(
        ordinal: u64,
        personality: Personality,
        extranonce: ExtranonceState,
        registry: Arc<JobRegistry>,
        outbound: Outbound,
        directive: ReconnectDirective,
        closing: CancellationToken,
    ) -> Self {
        Self {
            ordinal,
            personality,
            extranonce,
            job_counter: 1,
            jobs_sent: 0,
            registry,
            outbound,
            directive,
            closing,
        }
    }

    pub fn spawn(self) -> JoinHandle<SchedulerExit> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) -> SchedulerExit {
        match self.issue_jobs().await {
            Ok(SchedulerExit::Cancelled) | Err(PoolError::SessionClosing) => {
                debug!(target: LOG_TARGET, "Periodic job cancelled (session {})", self.ordinal);
                SchedulerExit::Cancelled
            }
            Ok(exit) => exit,
            Err(e) => {
                warn!(target: LOG_TARGET, "Job scheduler for session {} stopped: {}", self.ordinal, e);
                SchedulerExit::WriterClosed
            }
        }
    }

    async fn issue_jobs(&mut self) -> Result<SchedulerExit, PoolError> {
        if self.personality.announce_extranonce {
            self.send_extranonce().await?;
        }
        if !self.pause(FIRST_JOB_DELAY).await {
            return Ok(SchedulerExit::Cancelled);
        }

        // Tick 0 is the immediate job; rotation counts periodic ticks only
        let mut tick: u64 = 0;
        loop {
            if tick > 0 {
                if !self.pause(self.personality.job_interval).await {
                    return Ok(SchedulerExit::Cancelled);
                }
                if self.personality.rotation.fires_on(tick) {
                    self.rotate_extranonce();
                    self.send_extranonce().await?;
                }
            }

            self.send_next_job().await?;
            self.jobs_sent += 1;
            tick += 1;

            if self.jobs_sent == self.directive.after_jobs {
                info!(target: LOG_TARGET, "Triggering client.reconnect after {} jobs.", self.jobs_sent);
                self.outbound
                    .send(StratumProtocol::create_reconnect(
                        &self.directive.host,
                        self.directive.port,
                        self.directive.wait_seconds,
                    ))
                    .await?;
                info!(target: LOG_TARGET, "Closing connection after reconnect directive...");
                self.pause(self.directive.grace).await;
                self.closing.cancel();
                return Ok(SchedulerExit::Reconnected);
            }
        }
    }

    /// Sleep unless the session is closing. Returns false when cancelled.
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.closing.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    fn rotate_extranonce(&mut self) {
        if let ExtranonceRotation::EveryNthJob { extranonce1_bytes, .. } = self.personality.rotation {
            let previous = std::mem::replace(
                &mut self.extranonce.extranonce1,
                FormatUtils::random_hex(extranonce1_bytes),
            );
            info!(target: LOG_TARGET,
                "🔄 Rotating extranonce1 for session {}: {} -> {}",
                self.ordinal, previous, self.extranonce.extranonce1
            );
        }
    }

    async fn send_extranonce(&self) -> Result<(), PoolError> {
        self.outbound
            .send(StratumProtocol::create_set_extranonce(
                &self.extranonce.extranonce1,
                self.extranonce.extranonce2_size,
            ))
            .await
    }

    async fn send_next_job(&mut self) -> Result<(), PoolError> {
        let job_id = format_job_id(self.job_counter);
        self.job_counter += 1;
        self.registry.register(&job_id);

        let job = Job::synthetic(job_id);
        debug!(target: LOG_TARGET, "📋 New job {} for session {}", job.job_id, self.ordinal);
        self.outbound.send(StratumProtocol::create_notify(&job)).await
    }
}


// Changelog:
// - v1.2.0 (2026-10-16): Rotation counts periodic ticks, not the immediate job.
//   - Sends wait on the bounded outbound queue.
// - v1.1.0 (2026-10-16): Scheduler owns the extranonce state.
//   - ExtranonceState is moved in at spawn; the read loop no longer touches it.
//   - Reconnect host/port/wait and job threshold come from ReconnectDirective.
// - v1.0.0 (2026-10-14): Initial periodic job issuance with reconnect trigger.
